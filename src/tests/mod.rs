mod database_request_test;
mod poller_test;
