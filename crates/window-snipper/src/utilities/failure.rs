use tracing::error;

pub fn log_and_panic<Err: core::fmt::Display>(error: Err, message: &str) -> ! {
    error!("{message}: {error}");

    panic!("{message}: {error}");
}

pub fn report<Err: core::fmt::Display>(error: Err, message: &str) {
    error!("{message}: {error}");
}

pub trait Failure<T> {
    /// Logs the failure and carries on without the value.
    fn report(self, message: &str) -> Option<T>;

    /// Logs the failure then panics, for failures the application cannot start without.
    fn log_and_panic(self, message: &str) -> T;
}

impl<T, E: core::fmt::Display> Failure<T> for Result<T, E> {
    fn report(self, message: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                report(error, message);
                None
            }
        }
    }

    fn log_and_panic(self, message: &str) -> T {
        match self {
            Ok(value) => value,
            Err(error) => log_and_panic(error, message),
        }
    }
}

impl<T> Failure<T> for Option<T> {
    fn report(self, message: &str) -> Self {
        match self {
            Some(value) => Some(value),
            None => {
                report("Was None", message);
                None
            }
        }
    }

    fn log_and_panic(self, message: &str) -> T {
        match self {
            Some(value) => value,
            None => log_and_panic("Was None", message),
        }
    }
}
