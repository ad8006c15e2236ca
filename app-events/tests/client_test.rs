use app_events::{AppEventsClient, SERVICE_NAME, pb, service_identity};
use bytes::Bytes;
use prost::Message;
use std::sync::Mutex;
use tonic::metadata::MetadataMap;
use unicall_core::call::{CallError, RawCall, channel};
use unicall_core::descriptor::MethodDescriptor;
use unicall_core::options::CallOptions;
use unicall_core::transport::Transport;

/// Records every invocation and answers with a pre-encoded response payload.
struct RecordingTransport {
    response: Bytes,
    defaults: CallOptions,
    seen: Mutex<Vec<(usize, &'static str, MetadataMap)>>,
}

impl RecordingTransport {
    fn new(response: Bytes) -> Self {
        Self {
            response,
            defaults: CallOptions::new(),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn with_defaults(mut self, defaults: CallOptions) -> Self {
        self.defaults = defaults;
        self
    }

    fn seen(&self) -> Vec<(usize, &'static str, MetadataMap)> {
        std::mem::take(&mut self.seen.lock().unwrap())
    }
}

impl Transport for RecordingTransport {
    fn default_options(&self) -> CallOptions {
        self.defaults.clone()
    }

    fn invoke(&self, method: MethodDescriptor, options: CallOptions, input: Bytes) -> RawCall {
        self.seen
            .lock()
            .unwrap()
            .push((method.index(), method.name(), options.metadata().clone()));
        let (mut completer, call) = channel(input);
        completer.send_response(self.response.clone());
        completer.finish(MetadataMap::new());
        call
    }
}

fn empty_response() -> Bytes {
    Bytes::from(pb::SendNotificationResponse {}.encode_to_vec())
}

#[test]
fn descriptor_table_is_stable() {
    let service = service_identity();
    assert_eq!(service.name(), SERVICE_NAME);

    let names: Vec<_> = service.methods().iter().map(|m| m.name()).collect();
    assert_eq!(
        names,
        [
            "Relogin",
            "SendNotification",
            "SendPendingHeadlessAuthentication",
            "PromptMFA",
        ]
    );
    for (position, method) in service.methods().iter().enumerate() {
        assert_eq!(method.index(), position);
    }
}

#[tokio::test]
async fn send_notification_dispatches_to_descriptor_index_1() {
    let transport = RecordingTransport::new(empty_response());
    let client = AppEventsClient::new(transport).unwrap();

    let call = client.send_notification(
        pb::SendNotificationRequest {
            text: "hi".to_string(),
        },
        None,
    );

    // The request echo is available immediately, before any awaiting.
    assert_eq!(call.request().text, "hi");
    let echoed = pb::SendNotificationRequest::decode(call.raw().request().await.unwrap()).unwrap();
    assert_eq!(echoed.text, "hi");

    call.response().await.unwrap();
    let seen = client.transport().seen();
    assert_eq!(seen[0].0, 1);
    assert_eq!(seen[0].1, "SendNotification");
}

#[tokio::test]
async fn each_method_resolves_its_own_descriptor() {
    let transport = RecordingTransport::new(empty_response());
    let client = AppEventsClient::new(transport).unwrap();

    client
        .relogin(pb::ReloginRequest::default(), None)
        .response()
        .await
        .ok();
    client
        .send_notification(pb::SendNotificationRequest::default(), None)
        .response()
        .await
        .ok();
    client
        .send_pending_headless_authentication(
            pb::SendPendingHeadlessAuthenticationRequest::default(),
            None,
        )
        .response()
        .await
        .ok();
    client
        .prompt_mfa(pb::PromptMfaRequest::default(), None)
        .response()
        .await
        .ok();

    let seen = client.transport().seen();
    let indices: Vec<_> = seen.iter().map(|(index, name, _)| (*index, *name)).collect();
    assert_eq!(
        indices,
        [
            (0, "Relogin"),
            (1, "SendNotification"),
            (2, "SendPendingHeadlessAuthentication"),
            (3, "PromptMFA"),
        ]
    );
}

#[tokio::test]
async fn responses_decode_as_the_method_output_type() {
    let response = pb::PromptMfaResponse {
        totp_code: "123456".to_string(),
    };
    let transport = RecordingTransport::new(Bytes::from(response.encode_to_vec()));
    let client = AppEventsClient::new(transport).unwrap();

    let call = client.prompt_mfa(
        pb::PromptMfaRequest {
            root_cluster_uri: "cluster.example.com".to_string(),
            reason: "daemon login".to_string(),
            totp: true,
            webauthn: true,
        },
        None,
    );

    assert_eq!(call.response().await.unwrap().totp_code, "123456");
    let (_, status) = call.trailers().await.unwrap();
    assert_eq!(status.code(), tonic::Code::Ok);
}

#[tokio::test]
async fn malformed_response_payload_surfaces_a_decode_failure() {
    // Valid at the transport level, but not a decodable PromptMfaResponse.
    let transport = RecordingTransport::new(Bytes::from_static(&[0xff, 0xff, 0xff]));
    let client = AppEventsClient::new(transport).unwrap();

    let call = client.prompt_mfa(pb::PromptMfaRequest::default(), None);
    match call.response().await {
        Err(CallError::Decode(_)) => {}
        other => panic!("expected decode failure, got {other:?}"),
    }
    assert_eq!(call.response().await.unwrap_err().code(), tonic::Code::Internal);

    // The raw payload channel and the completion status are untouched by the
    // typed layer's decode failure.
    assert_eq!(
        call.raw().response().await.unwrap(),
        Bytes::from_static(&[0xff, 0xff, 0xff]),
    );
    assert_eq!(call.trailers().await.unwrap().1.code(), tonic::Code::Ok);
}

#[tokio::test]
async fn per_call_options_merge_over_transport_defaults() {
    let transport = RecordingTransport::new(empty_response()).with_defaults(
        CallOptions::new().with_metadata("x-origin", "daemon").unwrap(),
    );
    let client = AppEventsClient::new(transport).unwrap();

    let options = CallOptions::new().with_metadata("x-trace", "abc").unwrap();
    client
        .relogin(pb::ReloginRequest::default(), Some(options))
        .response()
        .await
        .unwrap();

    let seen = client.transport().seen();
    let (_, _, metadata) = &seen[0];
    assert_eq!(metadata.get("x-origin").unwrap().to_str().unwrap(), "daemon");
    assert_eq!(metadata.get("x-trace").unwrap().to_str().unwrap(), "abc");
}
