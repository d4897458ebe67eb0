mod http_reqwest;
mod socket_table;
mod system_command;
mod terminal_input;

pub use http_reqwest::ReqwestHttpClient;
pub use socket_table::{SsPortProbe, parse_listeners};
pub use system_command::SystemCommandRunner;
pub use terminal_input::{DefaultsInput, SelectedInput, TerminalInput};
