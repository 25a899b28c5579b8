pub mod cargo_env {
    pub const CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");
}

pub mod env {
    pub const SETTINGS_PREFIX: &str = "CITE_RUNNER";
}

pub mod defaults {
    pub const DISCLAIMER: &str = "This report was produced by an automated run of the OGC \
        TEAM Engine and is provided for information only. It is not an OGC certification.";
    pub const TEMPLATE_NAME: &str = "markdown";
    pub const NETWORK_TIMEOUT: &str = "20s";
    pub const POLL_INTERVAL: &str = "5s";
    pub const POLL_ATTEMPTS: u32 = 10;
    pub const TEAMENGINE_USERNAME: &str = "ogctest";
    pub const TEAMENGINE_PASSWORD: &str = "ogctest";
    pub const TARGET_UNDER_TEST: &str = "unknown";
}
