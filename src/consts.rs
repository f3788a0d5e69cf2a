pub mod dashboard_consts {
    //! Dashboard Configuration Constants
    //!
    //! Constants for the dashboard client, organized by functional area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Event buffer size between background tasks and the UI loop
    pub const EVENT_QUEUE_SIZE: usize = 256;

    // =============================================================================
    // REMOTE ENDPOINTS
    // =============================================================================

    /// Default base URL of the indicator API
    pub const DEFAULT_API_URL: &str = "https://localhost:7045";

    /// Default URL of the live update hub
    pub const DEFAULT_HUB_URL: &str = "https://localhost:7045/indicator";

    /// REST paths relative to the API base URL
    pub mod api_paths {
        pub const INDICATOR: &str = "api/Indicator";
        pub const BACKGROUND_IMAGE: &str = "api/BackgroundImage";
        pub const UPLOAD_IMAGE: &str = "api/BackgroundImage/upload-image";

        /// Multipart field carrying the uploaded image
        pub const UPLOAD_FIELD: &str = "image";
    }

    /// HTTP client timeouts
    pub mod http {
        use std::time::Duration;

        pub const CONNECT_TIMEOUT_SECS: u64 = 10;
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    // =============================================================================
    // LIVE UPDATE CHANNEL
    // =============================================================================

    /// Hub connection and reconnect configuration
    pub mod hub {
        use std::time::Duration;

        /// Fixed delay between connection attempts (milliseconds)
        pub const RECONNECT_INTERVAL_MS: u64 = 5000;

        /// Shortest delay accepted from configuration (milliseconds)
        pub const MIN_RECONNECT_INTERVAL_MS: u64 = 100;

        /// Interval between client keep-alive pings (seconds)
        pub const KEEP_ALIVE_SECS: u64 = 15;

        /// Hub method carrying (identifier, value) pairs
        pub const RECEIVE_TARGET: &str = "receive";

        /// Record separator terminating every hub protocol message
        pub const RECORD_SEPARATOR: char = '\u{1e}';

        pub const fn reconnect_interval() -> Duration {
            Duration::from_millis(RECONNECT_INTERVAL_MS)
        }

        pub const fn keep_alive_interval() -> Duration {
            Duration::from_secs(KEEP_ALIVE_SECS)
        }
    }

    // =============================================================================
    // CANVAS LAYOUT
    // =============================================================================

    /// Pixel to terminal cell conversion for widget positions
    pub mod canvas {
        /// Horizontal pixels covered by one terminal column
        pub const PIXELS_PER_COLUMN: i32 = 8;
        /// Vertical pixels covered by one terminal row
        pub const PIXELS_PER_ROW: i32 = 16;

        /// Widget box size in cells
        pub const WIDGET_WIDTH: u16 = 18;
        pub const WIDGET_HEIGHT: u16 = 3;
        pub const WIDGET_WITH_ACTIONS_HEIGHT: u16 = 4;
    }

    /// Identifiers of the input surfaces of the dashboard.
    pub mod surfaces {
        pub const CREATE_INDICATOR_FORM: &str = "create-indicator-form";
        pub const UPDATE_INDICATOR_FORM: &str = "update-indicator-form";
        pub const BACKGROUND_AREA: &str = "backgroundArea";
        pub const CHANGE_BACKGROUND_FORM: &str = "changeBg";
        pub const CHANGE_BACKGROUND_NUMBER: &str = "changeBgNumber";
        pub const IMAGE_FORM: &str = "imageForm";
        pub const IMAGE_INPUT: &str = "imageInput";
        pub const BACKGROUND_IMAGE: &str = "background-image";
    }
}
