//! Application services for notification fan-out.

mod dispatcher;

pub use dispatcher::{
    DispatchError, DispatchReceipt, DispatchRequest, DispatchResult, NotificationDispatcher,
};
