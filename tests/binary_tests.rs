//! Runs the exporter binary on its fixed port, reads from it and interrupts it.
#![cfg(unix)]

use enviro_exporter::DEFAULT_PORT;
use std::io::{Read, Write};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(20);
const EXIT_TIMEOUT: Duration = Duration::from_secs(10);

// Both tests need port 8001
static PORT: Mutex<()> = Mutex::new(());

struct Exporter {
    child: Child,
}

impl Exporter {
    fn start(args: &[&str]) -> Self {
        let child = Command::new(env!("CARGO_BIN_EXE_enviro_exporter"))
            .args(args)
            .env("RUST_LOG", "warn")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Should start the exporter binary");
        Self { child }
    }

    /// Poll `addr` until the exporter answers a GET, returning the response.
    fn wait_for_reading(&mut self, addr: SocketAddr) -> String {
        let deadline = Instant::now() + STARTUP_TIMEOUT;
        loop {
            if let Ok(response) = get(addr) {
                return response;
            }
            if let Some(status) = self.child.try_wait().expect("Should poll the child") {
                panic!("exporter exited before serving: {}", status);
            }
            assert!(Instant::now() < deadline, "exporter never answered on {}", addr);
            thread::sleep(Duration::from_millis(100));
        }
    }

    fn interrupt(&mut self) -> ExitStatus {
        let sent = Command::new("kill")
            .args(["-INT", &self.child.id().to_string()])
            .status()
            .expect("Should run kill");
        assert!(sent.success());

        let deadline = Instant::now() + EXIT_TIMEOUT;
        loop {
            if let Some(status) = self.child.try_wait().expect("Should poll the child") {
                return status;
            }
            assert!(Instant::now() < deadline, "exporter ignored SIGINT");
            thread::sleep(Duration::from_millis(50));
        }
    }
}

impl Drop for Exporter {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn get(addr: SocketAddr) -> std::io::Result<String> {
    let mut stream = TcpStream::connect_timeout(&addr, Duration::from_secs(1))?;
    stream.set_read_timeout(Some(Duration::from_secs(10)))?;
    stream.write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")?;
    let mut response = String::new();
    stream.read_to_string(&mut response)?;
    Ok(response)
}

fn assert_reading(response: &str) {
    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    let body = response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .expect("Should have a body");
    let value: serde_json::Value = serde_json::from_str(body).expect("Should be JSON");
    for key in ["temperature", "pressure", "humidity", "P2", "P1"] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
}

/// Test the default binary serves on IPv4 and exits 0 on SIGINT
#[test]
fn test_ipv4_sigint_exits_cleanly() {
    let _port = PORT.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut exporter = Exporter::start(&[]);

    let response = exporter.wait_for_reading(SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)));
    assert_reading(&response);

    let status = exporter.interrupt();
    assert!(status.success(), "exit status {}", status);
    assert_eq!(status.code(), Some(0));
}

/// Test `--enableipv6` serves on the IPv6 wildcard and exits 0 on SIGINT
#[test]
fn test_ipv6_sigint_exits_cleanly() {
    if TcpListener::bind((Ipv6Addr::LOCALHOST, 0)).is_err() {
        eprintln!("no IPv6 loopback on this host, skipping");
        return;
    }
    let _port = PORT.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut exporter = Exporter::start(&["--enableipv6"]);

    let response = exporter.wait_for_reading(SocketAddr::from((Ipv6Addr::LOCALHOST, DEFAULT_PORT)));
    assert_reading(&response);

    let status = exporter.interrupt();
    assert!(status.success(), "exit status {}", status);
    assert_eq!(status.code(), Some(0));
}
