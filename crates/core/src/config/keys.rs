// Configuration keys (ADR: No magic values)

/// Transport type used when `create_client` gets no explicit type
pub const DEFAULT_TRANSPORT_TYPE: &str = "faxdispatch.transport.default.type";

/// Prefix mapping a transport type to its registered implementation name
pub const TRANSPORT_TYPE_MAP_PREFIX: &str = "faxdispatch.transport.type.map.";

/// Job monitor implementation shared by every client of a factory
pub const MONITOR_IMPLEMENTATION: &str = "faxdispatch.monitor.implementation";

/// Polling interval of the polling job monitor (milliseconds)
pub const MONITOR_POLLING_INTERVAL: &str = "faxdispatch.monitor.polling.interval";

/// `true`: wait a full interval after each cycle; `false`: keep a fixed cadence
pub const MONITOR_POLLING_INTERVAL_FIXED: &str = "faxdispatch.monitor.polling.interval.fixed";

/// Interception on/off switch
pub const INTERCEPTION_ENABLED: &str = "faxdispatch.interception.enabled";

/// `;` separated interceptor names
pub const INTERCEPTION_LIST: &str = "faxdispatch.interception.list";

/// Prefix mapping an interceptor name to its registered implementation name
pub const INTERCEPTION_TYPE_PREFIX: &str = "faxdispatch.interception.type.";

/// Separator for list valued keys
pub const LIST_SEPARATOR: char = ';';

/// Placeholder replaced by the property part of a transport instance
pub const PROPERTY_PART_PLACEHOLDER: &str = "{0}";

/// Default job monitor implementation
pub const DEFAULT_MONITOR_IMPLEMENTATION: &str = "polling";

pub fn transport_type_map_key(transport_type: &str) -> String {
    format!("{TRANSPORT_TYPE_MAP_PREFIX}{transport_type}")
}

pub fn interception_type_key(name: &str) -> String {
    format!("{INTERCEPTION_TYPE_PREFIX}{name}")
}
