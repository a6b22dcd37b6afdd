//! Runs the client against a scripted device on a local port.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use pjlink::{
    CancellationToken, Client, Endpoint, Error, InputSource, LampInfo, MuteState, PowerState,
    RejectCode, Severity,
};

/// One connection as the device sees it.
struct Exchange {
    /// `None` keeps the connection open without ever greeting.
    greeting: Option<&'static str>,
    /// `None` hangs up after reading the command.
    reply: Option<&'static str>,
}

fn exchange(greeting: &'static str, reply: &'static str) -> Exchange {
    Exchange {
        greeting: Some(greeting),
        reply: Some(reply),
    }
}

/// Serves `script` one connection at a time and returns every command line received.
async fn fake_device(script: Vec<Exchange>) -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let task = tokio::spawn(async move {
        let mut received = Vec::new();
        for step in script {
            let (stream, _) = listener.accept().await.unwrap();
            let (read, mut write) = stream.into_split();

            let greeting = match step.greeting {
                Some(greeting) => greeting,
                None => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    continue;
                }
            };
            write
                .write_all(format!("{}\r", greeting).as_bytes())
                .await
                .unwrap();

            let mut line = Vec::new();
            let n = BufReader::new(read)
                .read_until(b'\r', &mut line)
                .await
                .unwrap();
            if n == 0 {
                continue;
            }
            line.pop();
            received.push(String::from_utf8(line).unwrap());

            if let Some(reply) = step.reply {
                write
                    .write_all(format!("{}\r", reply).as_bytes())
                    .await
                    .unwrap();
            }
        }
        received
    });

    (port, task)
}

fn client(port: u16, secret: &str) -> Client {
    Client::new(Endpoint::new("127.0.0.1", secret).unwrap().with_port(port))
}

#[tokio::test]
async fn open_device_authenticates_without_a_command() {
    let (port, device) = fake_device(vec![Exchange {
        greeting: Some("PJLINK 0"),
        reply: None,
    }])
    .await;

    let client = client(port, "");
    assert!(client.authenticate().await.unwrap());
    assert!(client.last_auth_token().is_none());
    assert!(device.await.unwrap().is_empty());
}

#[tokio::test]
async fn secured_device_gets_prefixed_power_query() {
    let (port, device) = fake_device(vec![exchange("PJLINK 1 abcdef12", "%1POWR=0")]).await;

    let client = client(port, "pass");
    assert!(client.authenticate().await.unwrap());

    let received = device.await.unwrap();
    assert_eq!(received, vec!["5b32d8abd7e35dbd4aeb3751b70b7101%1POWR ?"]);
    assert_eq!(
        client.last_auth_token().unwrap().as_str(),
        "5b32d8abd7e35dbd4aeb3751b70b7101"
    );
}

#[tokio::test]
async fn wrong_secret_is_false_not_an_error() {
    let (port, _device) = fake_device(vec![exchange("PJLINK 1 abcdef12", "PJLINK ERRA")]).await;
    assert!(!client(port, "wrong").authenticate().await.unwrap());
}

#[tokio::test]
async fn unrelated_error_still_authenticates() {
    let (port, _device) = fake_device(vec![exchange("PJLINK 1 abcdef12", "%1POWR=ERR3")]).await;
    assert!(client(port, "pass").authenticate().await.unwrap());
}

#[tokio::test]
async fn unreachable_device_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    match client(port, "pass").authenticate().await {
        Err(Error::Transport(_)) => {}
        other => panic!("expected a transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn each_handshake_derives_a_fresh_token() {
    let (port, device) = fake_device(vec![
        exchange("PJLINK 1 00000001", "%1POWR=1"),
        exchange("PJLINK 1 00000002", "%1POWR=1"),
    ])
    .await;

    let client = client(port, "pass");
    assert_eq!(client.power().await.unwrap(), PowerState::PoweredOn);
    let first = client.last_auth_token().unwrap();
    assert_eq!(client.power().await.unwrap(), PowerState::PoweredOn);
    let second = client.last_auth_token().unwrap();

    assert_ne!(first, second);
    assert_eq!(second, pjlink::auth::derive("00000002", "pass"));

    let received = device.await.unwrap();
    assert_eq!(received[1], format!("{}%1POWR ?", second));
}

#[tokio::test]
async fn busy_device_rejects_power_on() {
    let (port, device) = fake_device(vec![exchange("PJLINK 0", "%1POWR=ERR3")]).await;

    match client(port, "").set_power(true).await {
        Err(Error::CommandRejected(RejectCode::UnavailableTime)) => {}
        other => panic!("expected ERR3, got {:?}", other),
    }
    assert_eq!(device.await.unwrap(), vec!["%1POWR 1"]);
}

#[tokio::test]
async fn power_query_error_is_unknown() {
    let (port, _device) = fake_device(vec![
        exchange("PJLINK 0", "%1POWR=ERR4"),
        exchange("PJLINK 0", "%1POWR=3"),
    ])
    .await;

    let client = client(port, "");
    assert_eq!(client.power().await.unwrap(), PowerState::Unknown);
    assert_eq!(client.power().await.unwrap(), PowerState::WarmUp);
}

#[tokio::test]
async fn unreadable_power_state_is_unknown() {
    let (port, _device) = fake_device(vec![
        exchange("PJLINK 0", "%1POWR=on"),
        exchange("PJLINK 0", "%1POWR="),
    ])
    .await;

    let client = client(port, "");
    assert_eq!(client.power().await.unwrap(), PowerState::Unknown);
    assert_eq!(client.power().await.unwrap(), PowerState::Unknown);
}

#[tokio::test]
async fn input_list_preserves_wire_order() {
    let (port, _device) = fake_device(vec![exchange("PJLINK 0", "%1INST=11 21 33")]).await;

    assert_eq!(
        client(port, "").inputs().await.unwrap(),
        Some(vec![
            InputSource::RgbDSub,
            InputSource::VideoComposite,
            InputSource::DigitalHdmi,
        ])
    );
}

#[tokio::test]
async fn unsupported_input_list_is_not_empty_list() {
    let (port, _device) = fake_device(vec![
        exchange("PJLINK 0", "%1INST=ERR1"),
        exchange("PJLINK 0", "%1INST="),
    ])
    .await;

    let client = client(port, "");
    assert_eq!(client.inputs().await.unwrap(), None);
    assert_eq!(client.inputs().await.unwrap(), Some(vec![]));
}

#[tokio::test]
async fn set_input_reads_back_on_a_second_connection() {
    let (port, device) = fake_device(vec![
        exchange("PJLINK 0", "%1INPT=OK"),
        exchange("PJLINK 0", "%1INPT=33"),
    ])
    .await;

    let input = client(port, "")
        .set_input(InputSource::DigitalHdmi)
        .await
        .unwrap();
    assert_eq!(input, InputSource::DigitalHdmi);
    assert_eq!(device.await.unwrap(), vec!["%1INPT 33", "%1INPT ?"]);
}

#[tokio::test]
async fn failed_read_back_is_not_a_failed_switch() {
    let (port, _device) = fake_device(vec![
        exchange("PJLINK 0", "%1INPT=OK"),
        exchange("PJLINK 0", "%1INPT=ERR3"),
    ])
    .await;

    match client(port, "").set_input(InputSource::VideoComposite).await {
        Err(Error::Requery(inner)) => assert_eq!(
            inner.rejection(),
            Some(RejectCode::UnavailableTime)
        ),
        other => panic!("expected a requery error, got {:?}", other),
    }
}

#[tokio::test]
async fn rejected_switch_skips_read_back() {
    let (port, device) = fake_device(vec![exchange("PJLINK 0", "%1INPT=ERR2")]).await;

    match client(port, "").set_input(InputSource::Network9).await {
        Err(Error::CommandRejected(RejectCode::OutOfParameter)) => {}
        other => panic!("expected ERR2, got {:?}", other),
    }
    assert_eq!(device.await.unwrap(), vec!["%1INPT 59"]);
}

#[tokio::test]
async fn set_mute_reads_back() {
    let (port, device) = fake_device(vec![
        exchange("PJLINK 0", "%1AVMT=OK"),
        exchange("PJLINK 0", "%1AVMT=31"),
    ])
    .await;

    let state = client(port, "")
        .set_mute(MuteState::AudioVideoMuteOn)
        .await
        .unwrap();
    assert!(state.video_muted() && state.audio_muted());
    assert_eq!(device.await.unwrap(), vec!["%1AVMT 31", "%1AVMT ?"]);
}

#[tokio::test]
async fn failed_mute_read_back_is_not_a_failed_mute() {
    let (port, device) = fake_device(vec![
        exchange("PJLINK 0", "%1AVMT=OK"),
        exchange("PJLINK 0", "%1AVMT=ERR3"),
    ])
    .await;

    match client(port, "").set_mute(MuteState::VideoMuteOn).await {
        Err(Error::Requery(inner)) => assert_eq!(
            inner.rejection(),
            Some(RejectCode::UnavailableTime)
        ),
        other => panic!("expected a requery error, got {:?}", other),
    }
    assert_eq!(device.await.unwrap(), vec!["%1AVMT 11", "%1AVMT ?"]);
}

#[tokio::test]
async fn status_and_identity_queries() {
    let (port, device) = fake_device(vec![
        exchange("PJLINK 0", "%1ERST=000000"),
        exchange("PJLINK 0", "%1ERST=020001"),
        exchange("PJLINK 0", "%1LAMP=1500 1 20 0"),
        exchange("PJLINK 0", "%1NAME=Hall A"),
        exchange("PJLINK 0", "%1INF1=EPSON"),
        exchange("PJLINK 0", "%1INF2=EB-L1500U"),
        exchange("PJLINK 0", "%1INFO="),
        exchange("PJLINK 0", "%1CLSS=1"),
    ])
    .await;

    let client = client(port, "");
    assert!(client.error_status().await.unwrap().is_ok());

    let status = client.error_status().await.unwrap();
    assert_eq!(status.lamp, Severity::Error);
    assert_eq!(status.other, Severity::Warning);

    assert_eq!(
        client.lamp().await.unwrap(),
        LampInfo {
            hours: 1500,
            is_on: true
        }
    );
    assert_eq!(client.name().await.unwrap(), "Hall A");
    assert_eq!(client.manufacturer().await.unwrap(), "EPSON");
    assert_eq!(client.product_name().await.unwrap(), "EB-L1500U");
    assert_eq!(client.other_info().await.unwrap(), "");
    assert_eq!(client.class().await.unwrap(), 1);

    assert_eq!(
        device.await.unwrap(),
        vec![
            "%1ERST ?", "%1ERST ?", "%1LAMP ?", "%1NAME ?", "%1INF1 ?", "%1INF2 ?", "%1INFO ?",
            "%1CLSS ?",
        ]
    );
}

#[tokio::test]
async fn malformed_error_status() {
    let (port, _device) = fake_device(vec![exchange("PJLINK 0", "%1ERST=1?0000")]).await;

    match client(port, "").error_status().await {
        Err(Error::MalformedResponse(_)) => {}
        other => panic!("expected a malformed response, got {:?}", other),
    }
}

#[tokio::test]
async fn invalid_greeting_is_a_protocol_error() {
    let (port, _device) = fake_device(vec![exchange("HELLO", "%1POWR=1")]).await;

    match client(port, "").power().await {
        Err(Error::Protocol(_)) => {}
        other => panic!("expected a protocol error, got {:?}", other),
    }
}

#[tokio::test]
async fn hang_up_before_reply_is_a_protocol_error() {
    let (port, _device) = fake_device(vec![Exchange {
        greeting: Some("PJLINK 0"),
        reply: None,
    }])
    .await;

    match client(port, "").name().await {
        Err(Error::Protocol(_)) => {}
        other => panic!("expected a protocol error, got {:?}", other),
    }
}

#[tokio::test]
async fn silent_device_times_out() {
    let (port, _device) = fake_device(vec![Exchange {
        greeting: None,
        reply: None,
    }])
    .await;

    let endpoint = Endpoint::new("127.0.0.1", "")
        .unwrap()
        .with_port(port)
        .with_timeout(Duration::from_millis(100));
    match Client::new(endpoint).power().await {
        Err(Error::Transport(e)) => assert_eq!(e.kind(), std::io::ErrorKind::TimedOut),
        other => panic!("expected a timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn cancellation_aborts_a_pending_operation() {
    let (port, _device) = fake_device(vec![Exchange {
        greeting: None,
        reply: None,
    }])
    .await;

    let client = client(port, "");
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    match pjlink::cancellable(&token, client.power()).await {
        Err(Error::Cancelled) => {}
        other => panic!("expected cancellation, got {:?}", other),
    }
}
