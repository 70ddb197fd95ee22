//! Backend persistence capability. The core only describes the calls; the
//! shell owns the transport (REST in the reference deployment) and resolves
//! push requests with the server's verdict. Read-state writes are
//! fire-and-forget: the core never waits for them.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notifications::{NotificationId, NotificationReadState};
use crate::route_tabs::RouteTab;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum ApiOperation {
    PushRouteTabs {
        route_tabs: Vec<RouteTab>,
    },
    PutNotificationReadState {
        new_state: NotificationReadState,
        ids: Vec<NotificationId>,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ApiOutput {
    /// Server verdict for a route-tab push; `ok: false` is a rejected write.
    RouteTabsPushed { ok: bool },
    /// Acknowledgement shape for notify-only calls.
    Done,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status: {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
}

pub type ApiResult = Result<ApiOutput, ApiError>;

impl Operation for ApiOperation {
    type Output = ApiResult;
}

pub struct Api<Ev> {
    context: CapabilityContext<ApiOperation, Ev>,
}

impl<Ev> std::fmt::Debug for Api<Ev> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api").finish_non_exhaustive()
    }
}

impl<Ev> Capability<Ev> for Api<Ev> {
    type Operation = ApiOperation;
    type MappedSelf<MappedEv> = Api<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Api::new(self.context.map_event(f))
    }
}

impl<Ev> Api<Ev> {
    pub fn new(context: CapabilityContext<ApiOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Api<Ev>
where
    Ev: Send + 'static,
{
    /// Persist the route-tab snapshot; the shell's response comes back as
    /// the event built by `make_event`.
    pub fn push_route_tabs<F>(&self, route_tabs: Vec<RouteTab>, make_event: F)
    where
        F: FnOnce(ApiResult) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(ApiOperation::PushRouteTabs { route_tabs })
                .await;
            ctx.update_app(make_event(result));
        });
    }

    /// Fire-and-forget read-state write; the outcome is never observed.
    pub fn put_notification_read_state(
        &self,
        new_state: NotificationReadState,
        ids: Vec<NotificationId>,
    ) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(ApiOperation::PutNotificationReadState { new_state, ids })
                .await;
        });
    }
}
