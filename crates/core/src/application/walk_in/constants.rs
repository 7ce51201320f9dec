// Walk-in queue constants (no magic values)

/// Maximum length of patient/doctor labels (characters)
pub const MAX_NAME_LEN: usize = 128;

/// Environment variable enabling auto-promotion on completion
pub const ENV_AUTO_PROMOTE: &str = "FRONTDESK_AUTO_PROMOTE";

/// Environment variable selecting the transition policy (strict | lenient)
pub const ENV_TRANSITIONS: &str = "FRONTDESK_TRANSITIONS";
