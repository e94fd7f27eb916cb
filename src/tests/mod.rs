pub mod payment_tests;
