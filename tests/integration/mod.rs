/// Integration tests driving the server through JSON-RPC messages
mod support;
mod basic_integration;
mod dispatcher_scenarios;
