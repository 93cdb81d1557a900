mod detection_tests;
