//! Classification of server-side asynchronous state.

use crate::content::ContentItemVersion;

/// Where a resource stands in its asynchronous processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Still being processed.
    Pending,
    /// Processing finished successfully.
    Ready,
    /// Processing finished with an error.
    Failed,
}

/// Resources whose snapshot tells whether server processing has finished.
pub trait Settles {
    fn settlement(&self) -> Settlement;
}

impl<P> Settles for ContentItemVersion<P> {
    fn settlement(&self) -> Settlement {
        if self.is_ready {
            Settlement::Ready
        } else {
            Settlement::Pending
        }
    }
}
