//! Typed messages to and from [`Envelope`]s.
//!
//! Backend-originated events wrap their JSON in `{"message": "<json>"}`;
//! everything else carries its record directly as the payload.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use transpose_types::{BackendEvent, BackendNotice, KeyConsumed, MessagePayload, SyncState};

use crate::protocol::{
    channel, ControllerMessage, Envelope, Inbound, SyncError, WindowKind, WindowMessage, WriteBackPayload,
};

fn to_value<T: Serialize>(value: &T) -> Result<Value, SyncError> {
    serde_json::to_value(value).map_err(|e| SyncError::Codec(e.to_string()))
}

fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T, SyncError> {
    T::deserialize(value).map_err(|e| SyncError::Codec(e.to_string()))
}

/// Inner JSON text of a `{message}` payload.
fn unwrap_message(envelope: &Envelope) -> Result<String, SyncError> {
    from_value::<MessagePayload>(&envelope.payload).map(|p| p.message)
}

fn wrap_message<T: Serialize>(channel: &str, inner: &T) -> Result<Envelope, SyncError> {
    let message = serde_json::to_string(inner).map_err(|e| SyncError::Codec(e.to_string()))?;
    Ok(Envelope::new(channel, to_value(&MessagePayload { message })?))
}

fn source_kind(envelope: &Envelope) -> Result<WindowKind, SyncError> {
    envelope
        .source
        .as_deref()
        .and_then(WindowKind::from_label)
        .ok_or_else(|| SyncError::Codec(format!("unknown source on '{}'", envelope.channel)))
}

pub fn encode_backend_event(event: &BackendEvent) -> Result<Envelope, SyncError> {
    Ok(Envelope::new(channel::BACKEND_EVENT, to_value(event)?))
}

pub fn decode_backend_event(envelope: &Envelope) -> Result<BackendEvent, SyncError> {
    if envelope.channel != channel::BACKEND_EVENT {
        return Err(SyncError::Codec(format!("'{}' is not a backend event", envelope.channel)));
    }
    from_value(&envelope.payload)
}

pub fn encode_notice(notice: &BackendNotice) -> Result<Envelope, SyncError> {
    wrap_message(channel::FRONTEND_EVENT, notice)
}

pub fn encode_key_consumed(key: &KeyConsumed) -> Result<Envelope, SyncError> {
    wrap_message(channel::KEY_CONSUME, key)
}

pub fn encode_window(kind: WindowKind, message: &WindowMessage) -> Result<Envelope, SyncError> {
    Ok(match message {
        WindowMessage::Ready => Envelope::from_window(kind, kind.ready_channel(), Value::Null),
        WindowMessage::CloseRequested => Envelope::from_window(kind, channel::CLOSE_REQUESTED, Value::Null),
        WindowMessage::WriteBack(transposes) => Envelope::from_window(
            kind,
            channel::SHEET_VIEWER_WRITE_BACK,
            to_value(&WriteBackPayload { transposes: transposes.clone() })?,
        ),
    })
}

pub fn encode_controller(kind: WindowKind, message: &ControllerMessage) -> Result<Envelope, SyncError> {
    Ok(match message {
        ControllerMessage::State(state) => Envelope::new(kind.event_channel(), to_value(state)?),
        ControllerMessage::Close => Envelope::new(channel::WINDOW_CLOSE, Value::Null),
    })
}

/// Decode a message addressed to the window of `kind`.
pub fn decode_controller(kind: WindowKind, envelope: &Envelope) -> Result<ControllerMessage, SyncError> {
    if envelope.channel == kind.event_channel() {
        return from_value::<SyncState>(&envelope.payload).map(ControllerMessage::State);
    }
    if envelope.channel == channel::WINDOW_CLOSE {
        return Ok(ControllerMessage::Close);
    }
    Err(SyncError::Codec(format!("'{}' is not for {}", envelope.channel, kind)))
}

/// Classify anything arriving in the controller's inbox.
pub fn decode_inbound(envelope: &Envelope) -> Result<Inbound, SyncError> {
    let window = |kind, message| Ok(Inbound::Window { kind, message });
    match envelope.channel.as_str() {
        channel::FRONTEND_EVENT => {
            let message = unwrap_message(envelope)?;
            serde_json::from_str::<BackendNotice>(&message)
                .map(Inbound::Backend)
                .map_err(|e| SyncError::Codec(format!("frontend_event '{}': {}", message, e)))
        }
        channel::KEY_CONSUME => unwrap_message(envelope).map(Inbound::KeyConsumed),
        channel::TRANSPOSE_MONITOR_READY => window(WindowKind::TransposeMonitor, WindowMessage::Ready),
        channel::SHEET_VIEWER_READY => window(WindowKind::SheetViewer, WindowMessage::Ready),
        channel::CLOSE_REQUESTED => window(source_kind(envelope)?, WindowMessage::CloseRequested),
        channel::SHEET_VIEWER_WRITE_BACK => {
            let payload: WriteBackPayload = from_value(&envelope.payload)?;
            window(WindowKind::SheetViewer, WindowMessage::WriteBack(payload.transposes))
        }
        other => Err(SyncError::Codec(format!("unknown channel '{}'", other))),
    }
}
