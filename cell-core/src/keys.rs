//! Cell interface wire contract: settings keys and flag names.
//! Keys are case-sensitive; hyphen vs underscore must match peers exactly.

/// Published by the provider: name of the cell's message broker application.
pub const AMQP_SERVICE: &str = "amqp-service";
/// Published by the provider: name of the cell's database application.
pub const DB_SERVICE: &str = "db-service";
/// Published by the provider: name of the cell.
pub const CELL_NAME: &str = "cell-name";

pub const NETWORK_MANAGER: &str = "network_manager";
pub const QUANTUM_PLUGIN: &str = "quantum_plugin";
pub const QUANTUM_SECURITY_GROUPS: &str = "quantum_security_groups";
pub const QUANTUM_URL: &str = "quantum_url";
pub const REGION: &str = "region";
pub const VOLUME_SERVICE: &str = "volume_service";
pub const EC2_HOST: &str = "ec2_host";
pub const RESTART_TRIGGER: &str = "restart_trigger";
pub const ENABLE_SERIAL_CONSOLE: &str = "enable_serial_console";
pub const SERIAL_CONSOLE_BASE_URL: &str = "serial_console_base_url";

/// Keys returned by `get_console_data`.
pub const CONSOLE_KEYS: [&str; 2] = [ENABLE_SERIAL_CONSOLE, SERIAL_CONSOLE_BASE_URL];

/// Keys returned by `get_network_data`.
pub const NETWORK_KEYS: [&str; 4] = [
    NETWORK_MANAGER,
    QUANTUM_PLUGIN,
    QUANTUM_SECURITY_GROUPS,
    QUANTUM_URL,
];

/// Flag templates. `{endpoint_name}` is expanded per endpoint (see `flags::expand_name`).
pub mod flag {
    pub const CONNECTED: &str = "{endpoint_name}.connected";
    pub const AVAILABLE: &str = "{endpoint_name}.available";
    /// Owned by the host; the core only reads it.
    pub const JOINED: &str = "endpoint.{endpoint_name}.joined";
    /// Owned by the host; the core only reads it.
    pub const CHANGED: &str = "endpoint.{endpoint_name}.changed";
    pub const NEW_REQUEST: &str = "endpoint.{endpoint_name}.new-request";
}
