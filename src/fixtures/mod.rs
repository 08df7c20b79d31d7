pub mod demo_request;
