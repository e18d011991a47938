mod metrics_tests;
mod property_tests;
mod scenario_tests;
