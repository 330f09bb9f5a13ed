mod popup_tests;
mod router_tests;
