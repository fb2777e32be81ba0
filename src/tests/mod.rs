pub mod cursor_tests;
