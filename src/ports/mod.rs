mod command_runner;
mod http_client;
mod input_source;
mod port_probe;

pub use command_runner::CommandRunner;
pub use http_client::HttpClient;
pub use input_source::InputSource;
pub use port_probe::PortProbe;
