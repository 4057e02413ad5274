//! Routed pages and their navbar order.

/// A named page of the front-end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    About,
    Services,
    HowItWorks,
    Contact,
}

/// A button that sends the user to another page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallToAction {
    pub label: &'static str,
    pub target: Route,
}

impl Route {
    /// Every route, in navbar order.
    pub const ALL: [Route; 5] = [
        Route::Home,
        Route::About,
        Route::Services,
        Route::HowItWorks,
        Route::Contact,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::About => "/about",
            Route::Services => "/services",
            Route::HowItWorks => "/how-it-works",
            Route::Contact => "/contact",
        }
    }

    /// Navbar link text.
    pub fn label(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::About => "About",
            Route::Services => "Services",
            Route::HowItWorks => "How It Works",
            Route::Contact => "Contact",
        }
    }

    /// Resolve a request path. A single trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = match path.strip_suffix('/') {
            Some("") | None => path,
            Some(trimmed) => trimmed,
        };
        Route::ALL.into_iter().find(|r| r.path() == path)
    }

    pub fn call_to_action(&self) -> Option<CallToAction> {
        match self {
            Route::Home => Some(CallToAction {
                label: "Get Started",
                target: Route::Services,
            }),
            Route::About => Some(CallToAction {
                label: "Get in touch",
                target: Route::Contact,
            }),
            Route::Services | Route::HowItWorks | Route::Contact => None,
        }
    }
}
