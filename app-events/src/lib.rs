//! # App Events Client
//!
//! The client stub the local daemon uses to notify its companion UI process
//! of out-of-band events: login prompts, notifications, pending headless
//! authentication, and MFA prompts. The UI process serves the
//! `appevents.v1.AppEventsService`; the daemon only ever acts as the client.
//!
//! All heavy lifting lives in `unicall-core`; this crate contributes the
//! message types, the service's method descriptor table, and the
//! [`AppEventsClient`] dispatch surface, with one strongly-typed method per
//! descriptor.
use std::sync::{Arc, LazyLock};
use unicall_core::{
    call::CallHandle,
    descriptor::{ConstructionError, MethodDescriptor, ServiceIdentity},
    dispatch,
    options::CallOptions,
    transport::Transport,
};

pub mod pb;

/// The fully qualified service name.
pub const SERVICE_NAME: &str = "appevents.v1.AppEventsService";

static SERVICE: LazyLock<Arc<ServiceIdentity>> = LazyLock::new(|| {
    let identity = ServiceIdentity::new(
        SERVICE_NAME,
        vec![
            MethodDescriptor::unary::<pb::ReloginRequest, pb::ReloginResponse>("Relogin", 0),
            MethodDescriptor::unary::<pb::SendNotificationRequest, pb::SendNotificationResponse>(
                "SendNotification",
                1,
            ),
            MethodDescriptor::unary::<
                pb::SendPendingHeadlessAuthenticationRequest,
                pb::SendPendingHeadlessAuthenticationResponse,
            >("SendPendingHeadlessAuthentication", 2),
            MethodDescriptor::unary::<pb::PromptMfaRequest, pb::PromptMfaResponse>("PromptMFA", 3),
        ],
    );
    // The table above is part of this crate's source; a mistake in it cannot
    // be recovered from at runtime.
    Arc::new(identity.expect("static AppEventsService descriptor table is valid"))
});

/// The shared, read-only identity of `appevents.v1.AppEventsService`.
pub fn service_identity() -> &'static Arc<ServiceIdentity> {
    LazyLock::force(&SERVICE)
}

/// Client for `appevents.v1.AppEventsService`.
///
/// Each method merges the caller's options with the transport's defaults,
/// selects its descriptor by the fixed position it was resolved to at
/// construction, and hands the call to the dispatch core. No business logic
/// lives here.
pub struct AppEventsClient<T> {
    transport: T,
    methods: [MethodDescriptor; 4],
}

impl<T: Transport> AppEventsClient<T> {
    /// Builds a client over `transport`, verifying every method's descriptor
    /// (position, name and message types) against the service identity. A
    /// drifted descriptor table is rejected here, never at call time.
    pub fn new(transport: T) -> Result<Self, ConstructionError> {
        let service = service_identity();
        let methods = [
            service.expect_method::<pb::ReloginRequest, pb::ReloginResponse>(0, "Relogin")?,
            service.expect_method::<pb::SendNotificationRequest, pb::SendNotificationResponse>(
                1,
                "SendNotification",
            )?,
            service.expect_method::<
                pb::SendPendingHeadlessAuthenticationRequest,
                pb::SendPendingHeadlessAuthenticationResponse,
            >(2, "SendPendingHeadlessAuthentication")?,
            service.expect_method::<pb::PromptMfaRequest, pb::PromptMfaResponse>(3, "PromptMFA")?,
        ];
        Ok(Self { transport, methods })
    }

    /// The transport this client dispatches through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Asks the UI to display a login modal for the given root cluster. The
    /// call completes once the relogin procedure has finished.
    pub fn relogin(
        &self,
        input: pb::ReloginRequest,
        options: Option<CallOptions>,
    ) -> CallHandle<pb::ReloginRequest, pb::ReloginResponse> {
        let options = self.transport.merge_options(options.unwrap_or_default());
        dispatch::unary(&self.transport, self.methods[0], options, input)
    }

    /// Asks the UI to display a notification. The request carries a specific
    /// message rather than a free-form string so the UI stays in control of
    /// what is shown and how.
    pub fn send_notification(
        &self,
        input: pb::SendNotificationRequest,
        options: Option<CallOptions>,
    ) -> CallHandle<pb::SendNotificationRequest, pb::SendNotificationResponse> {
        let options = self.transport.merge_options(options.unwrap_or_default());
        dispatch::unary(&self.transport, self.methods[1], options, input)
    }

    /// Notifies the UI of a pending headless authentication so it can start
    /// resolving it.
    pub fn send_pending_headless_authentication(
        &self,
        input: pb::SendPendingHeadlessAuthenticationRequest,
        options: Option<CallOptions>,
    ) -> CallHandle<
        pb::SendPendingHeadlessAuthenticationRequest,
        pb::SendPendingHeadlessAuthenticationResponse,
    > {
        let options = self.transport.merge_options(options.unwrap_or_default());
        dispatch::unary(&self.transport, self.methods[2], options, input)
    }

    /// Notifies the UI that the daemon is waiting for the user to answer an
    /// MFA prompt.
    pub fn prompt_mfa(
        &self,
        input: pb::PromptMfaRequest,
        options: Option<CallOptions>,
    ) -> CallHandle<pb::PromptMfaRequest, pb::PromptMfaResponse> {
        let options = self.transport.merge_options(options.unwrap_or_default());
        dispatch::unary(&self.transport, self.methods[3], options, input)
    }
}
