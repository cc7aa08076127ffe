//! Error scenario integration tests

use audio_memo::application::ports::{DeviceError, ShareError};
use audio_memo::domain::config::ShareTarget;
use audio_memo::domain::recording::{AudioAsset, AudioMimeType, Container, Duration};
use audio_memo::domain::session::{ErrorKind, SessionError};

#[test]
fn session_errors_map_to_kinds() {
    let cases = [
        (SessionError::PermissionDenied, ErrorKind::PermissionDenied),
        (SessionError::StartFailed("x".into()), ErrorKind::StartFailed),
        (SessionError::StopFailed("x".into()), ErrorKind::StopFailed),
        (SessionError::NothingToPlay, ErrorKind::NothingToPlay),
        (SessionError::PlayFailed("x".into()), ErrorKind::PlayFailed),
        (SessionError::NothingToShare, ErrorKind::NothingToShare),
        (SessionError::SharingUnavailable, ErrorKind::SharingUnavailable),
        (SessionError::ShareFailed("x".into()), ErrorKind::ShareFailed),
    ];

    for (error, kind) in cases {
        assert_eq!(error.kind(), kind, "{}", error);
    }
}

#[test]
fn failure_messages_keep_port_detail() {
    let device = DeviceError::NoInputDevice;
    let error = SessionError::StartFailed(device.to_string());
    assert!(error.to_string().contains("No audio input device"));

    let share = ShareError::CopyFailed("clipboard locked".into());
    let error = SessionError::ShareFailed(share.to_string());
    assert!(error.to_string().contains("clipboard locked"));
}

#[test]
fn error_messages_are_single_line() {
    let errors = [
        SessionError::PermissionDenied,
        SessionError::NothingToPlay,
        SessionError::NothingToShare,
        SessionError::SharingUnavailable,
        SessionError::PlayFailed(DeviceError::InvalidVolume(2.0).to_string()),
    ];
    for error in errors {
        assert!(!error.to_string().contains('\n'), "{:?}", error);
    }
}

#[test]
fn invalid_values_name_the_input() {
    let duration = "5h".parse::<Duration>().unwrap_err();
    assert!(duration.to_string().contains("5h"));

    let container = "ogg".parse::<Container>().unwrap_err();
    assert!(container.to_string().contains("wav, flac"));

    let target = "email".parse::<ShareTarget>().unwrap_err();
    assert!(target.to_string().contains("open, clipboard, none"));
}

#[test]
fn empty_asset_locator_is_rejected() {
    assert!(AudioAsset::new("", AudioMimeType::Wav).is_err());
}
