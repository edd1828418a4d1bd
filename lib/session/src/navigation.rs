//! Navigation boundary.
//!
//! The session layer never renders anything itself. When it decides the user
//! has to log in again it calls the injected [`Navigator`], which the hosting
//! application maps onto its own login entry point.

/// Capability to send the user to the login entry point.
pub trait Navigator: Send + Sync {
    /// Navigates to the login entry point.
    fn to_login(&self);
}

impl<F> Navigator for F
where
    F: Fn() + Send + Sync,
{
    fn to_login(&self) {
        self()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Navigator;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Navigator that only counts how often it was asked to navigate.
    #[derive(Debug, Default)]
    pub(crate) struct CountingNavigator {
        count: AtomicUsize,
    }

    impl CountingNavigator {
        pub(crate) fn count(&self) -> usize {
            self.count.load(Ordering::SeqCst)
        }
    }

    impl Navigator for CountingNavigator {
        fn to_login(&self) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}
