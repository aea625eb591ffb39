#![allow(dead_code)]

pub mod tracing_setup {
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;

    static TRACING_INIT: Once = Once::new();

    /// Install a test-writer subscriber once per test binary; `RUST_LOG`
    /// controls verbosity.
    pub fn init() {
        TRACING_INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_test_writer()
                .try_init();
        });
    }
}

pub mod views {
    use viewful::app::{Body, Request};
    use viewful::rule::ViewArgs;
    use viewful::view::{Handler, View};

    /// View with default hooks.
    pub struct Plain;

    impl View for Plain {
        fn from_request(_request: &Request) -> Self {
            Plain
        }
    }

    /// Handler returning a fixed text with the default status.
    pub fn text(name: &str, body: &'static str) -> Handler<Plain> {
        Handler::new(name, move |_v: &mut Plain, _a: &ViewArgs| body)
    }

    /// View whose hooks record into its own state and rewrite the reply.
    pub struct Hooked {
        pub greeting: String,
        pub before_ran: bool,
    }

    impl View for Hooked {
        fn from_request(request: &Request) -> Self {
            Hooked {
                greeting: request.header("x-greeting").unwrap_or("hello").to_string(),
                before_ran: false,
            }
        }

        fn before_view_func(&mut self) {
            self.before_ran = true;
        }

        fn after_view_func(&mut self, body: Body, _status: u16) -> (Body, u16) {
            let text = body.as_text().unwrap_or_default();
            (Body::Text(format!("{text} world!")), 201)
        }
    }
}
