//
// Default configuration and default values:
//


/// Config file locations, first existing one wins:
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["/etc/certwatch/certwatch.conf", "certwatch.conf"];

/// Default log level when neither RUST_LOG nor config defines one:
pub const DEFAULT_LOG_LEVEL: &str = "INFO";


/// Default TLS port to check
pub const DEFAULT_PORT: u16 = 443;

/// Default per-host check timeout in seconds
pub const DEFAULT_CHECK_TIMEOUT: u64 = 10;

/// Default amount of hosts checked at once
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Upper bound for concurrently checked hosts
pub const MAX_CONCURRENCY: usize = 64;


/// Certificates expiring within this amount of days are reported as expiring soon
pub const EXPIRY_WARNING_DAYS: i64 = 30;

/// Seconds in a day, used by the expiry classifier
pub const SECONDS_PER_DAY: i64 = 86_400;


/// Owner label used in notifications when none is configured
pub const DEFAULT_OWNER: &str = "Not specified";

/// Notification title
pub const NOTIFICATION_TITLE: &str = "SSL Certificate Expiry Alert";

/// Webhook request timeout in seconds
pub const WEBHOOK_TIMEOUT: u64 = 30;

/// Webhook connection timeout in seconds
pub const WEBHOOK_CONNECTION_TIMEOUT: u64 = 10;
