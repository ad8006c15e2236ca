//! Message types for `appevents.v1.AppEventsService`, in generated prost
//! style.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReloginRequest {
    /// URI of the root cluster the user has to log back into.
    #[prost(string, tag = "1")]
    pub root_cluster_uri: String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ReloginResponse {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SendNotificationRequest {
    /// The notification text to display.
    #[prost(string, tag = "1")]
    pub text: String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct SendNotificationResponse {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SendPendingHeadlessAuthenticationRequest {
    #[prost(string, tag = "1")]
    pub root_cluster_uri: String,
    #[prost(string, tag = "2")]
    pub headless_authentication_id: String,
    #[prost(string, tag = "3")]
    pub headless_authentication_client_ip: String,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct SendPendingHeadlessAuthenticationResponse {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PromptMfaRequest {
    #[prost(string, tag = "1")]
    pub root_cluster_uri: String,
    /// Human-readable reason shown next to the prompt.
    #[prost(string, tag = "2")]
    pub reason: String,
    /// Whether a TOTP code is an acceptable answer.
    #[prost(bool, tag = "3")]
    pub totp: bool,
    /// Whether a WebAuthn tap is an acceptable answer.
    #[prost(bool, tag = "4")]
    pub webauthn: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PromptMfaResponse {
    /// The TOTP code the user entered, when TOTP was chosen.
    #[prost(string, tag = "1")]
    pub totp_code: String,
}
