pub mod web_server_simulator;
