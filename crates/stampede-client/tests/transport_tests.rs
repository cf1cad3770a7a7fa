#[cfg(test)]
mod test {
    // Exercises the HTTP transport against a minimal time-stamp authority on the loopback
    // interface. The mock answers each connection on its own thread, so slow replies don't hold
    // up concurrent requests.

    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc::{Receiver, Sender, channel};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use stampede_client::config::{PASSWORD_ENV, URL_ENV, USERNAME_ENV};
    use stampede_client::{Client, ClientError, Credentials, ErrorKind, TsaConfig, verify};
    use stampede_protocol::cursor::DerCursor;
    use stampede_protocol::der::tag;
    use stampede_protocol::test_utils::{status_only_response, synthetic_response};
    use stampede_protocol::{HashAlgorithm, MessageImprint, Nonce, PkiStatus};

    const GEN_TIME: &str = "20260103123456Z";

    #[derive(Debug)]
    struct Captured {
        request_line: String,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    }

    impl Captured {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    enum Reply {
        Granted,
        Body(Vec<u8>),
        Status(u16, &'static str),
        Stall(Duration),
    }

    struct MockTsa {
        url: String,
        captured: Receiver<Captured>,
    }

    fn spawn_tsa(reply: impl Fn() -> Reply + Send + Sync + 'static) -> MockTsa {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/tsr", listener.local_addr().unwrap());
        let (tx, rx) = channel();
        let reply = Arc::new(reply);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let tx = tx.clone();
                let reply = reply.clone();
                thread::spawn(move || serve(stream, tx, reply()));
            }
        });

        MockTsa { url, captured: rx }
    }

    fn serve(mut stream: TcpStream, tx: Sender<Captured>, reply: Reply) {
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            let (name, value) = line.split_once(':').unwrap();
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }

        let captured = Captured {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: Vec::new(),
        };
        let length: usize = captured.header("content-length").unwrap().parse().unwrap();
        let mut body = vec![0u8; length];
        reader.read_exact(&mut body).unwrap();
        let captured = Captured { body, ..captured };

        let (code, reason, payload) = match reply {
            Reply::Granted => {
                let (imprint, nonce) = parse_request(&captured.body);
                (200, "OK", synthetic_response(&imprint, &nonce, GEN_TIME))
            }
            Reply::Body(payload) => (200, "OK", payload),
            Reply::Status(code, reason) => (code, reason, b"unavailable".to_vec()),
            Reply::Stall(pause) => {
                thread::sleep(pause);
                return;
            }
        };

        let _ = tx.send(captured);

        let head = format!(
            "HTTP/1.1 {code} {reason}\r\nContent-Type: application/timestamp-reply\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n",
            payload.len()
        );
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(&payload);
    }

    // TimeStampReq ::= SEQUENCE { version, MessageImprint, nonce, certReq }
    fn parse_request(der: &[u8]) -> (MessageImprint, Nonce) {
        let mut outer = DerCursor::new(der);
        let mut fields = DerCursor::new(outer.expect(tag::SEQUENCE).unwrap());
        assert_eq!(fields.expect(tag::INTEGER).unwrap(), &[1]);

        let mut imprint = DerCursor::new(fields.expect(tag::SEQUENCE).unwrap());
        let mut algorithm_id = DerCursor::new(imprint.expect(tag::SEQUENCE).unwrap());
        let algorithm = HashAlgorithm::from_oid(algorithm_id.expect(tag::OID).unwrap()).unwrap();
        let digest = imprint.expect(tag::OCTET_STRING).unwrap();

        let nonce_value = fields.expect(tag::INTEGER).unwrap();
        let magnitude = &nonce_value[nonce_value.len().saturating_sub(Nonce::SIZE)..];
        let mut nonce = [0u8; Nonce::SIZE];
        nonce[Nonce::SIZE - magnitude.len()..].copy_from_slice(magnitude);

        assert_eq!(fields.expect(tag::BOOLEAN).unwrap(), &[0xff]);

        (
            MessageImprint::new(algorithm, digest).unwrap(),
            Nonce::from(nonce),
        )
    }

    #[test]
    fn successful_exchange_with_basic_auth() {
        let tsa = spawn_tsa(|| Reply::Granted);

        let client = Client::builder(tsa.url.as_str())
            .credentials(Credentials::new("alice", "secret"))
            .timeout(Duration::from_secs(5))
            .build();

        let response = client.timestamp(b"test-document").unwrap();
        assert_eq!(response.gen_time, Some("2026-01-03T12:34:56Z".parse().unwrap()));
        assert_eq!(response.status, Some(PkiStatus::Granted));
        assert_eq!(verify(b"test-document", &response.token), Ok(()));

        let captured = tsa.captured.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(captured.request_line, "POST /tsr HTTP/1.1");
        assert_eq!(captured.header("content-type"), Some("application/timestamp-query"));
        assert_eq!(captured.header("accept"), Some("application/timestamp-reply"));
        // base64("alice:secret")
        assert_eq!(captured.header("authorization"), Some("Basic YWxpY2U6c2VjcmV0"));
        assert_eq!(captured.body[0], 0x30);
    }

    #[test]
    fn no_authorization_without_credentials() {
        let tsa = spawn_tsa(|| Reply::Granted);

        let client = Client::builder(tsa.url.as_str()).build();
        client.timestamp(b"doc").unwrap();

        let captured = tsa.captured.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(captured.header("authorization"), None);
    }

    #[test]
    fn config_from_lookup_drives_the_client() {
        let tsa = spawn_tsa(|| Reply::Granted);
        let url = tsa.url.clone();

        let config = TsaConfig::from_lookup(|key| match key {
            k if k == URL_ENV => Some(url.clone()),
            k if k == USERNAME_ENV => Some("bob".to_string()),
            k if k == PASSWORD_ENV => Some("pw".to_string()),
            _ => None,
        })
        .unwrap();

        let response = Client::from_config(&config).timestamp(b"doc").unwrap();
        assert!(response.authority.starts_with("127.0.0.1:"));

        let captured = tsa.captured.recv_timeout(Duration::from_secs(5)).unwrap();
        // base64("bob:pw")
        assert_eq!(captured.header("authorization"), Some("Basic Ym9iOnB3"));
    }

    #[test]
    fn http_error_status_is_not_parsed() {
        let tsa = spawn_tsa(|| Reply::Status(500, "Internal Server Error"));

        let client = Client::builder(tsa.url.as_str()).build();
        let err = client.timestamp(b"doc").unwrap_err();

        match &err {
            ClientError::HttpStatus { code, reason } => {
                assert_eq!(*code, 500);
                assert_eq!(reason, "Internal Server Error");
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn stalled_authority_times_out() {
        let tsa = spawn_tsa(|| Reply::Stall(Duration::from_secs(3)));
        let timeout = Duration::from_millis(300);

        let client = Client::builder(tsa.url.as_str()).timeout(timeout).build();

        let start = Instant::now();
        let err = client.timestamp(b"doc").unwrap_err();

        assert!(start.elapsed() < Duration::from_secs(2), "{:?}", start.elapsed());
        assert!(matches!(err, ClientError::Timeout(t) if t == timeout), "{err:?}");
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.is_transient());
    }

    #[test]
    fn connection_refused_is_a_transport_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = Client::builder(format!("http://127.0.0.1:{port}/tsr"))
            .timeout(Duration::from_secs(2))
            .build();

        let err = client.timestamp(b"doc").unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)), "{err:?}");
        assert!(err.is_transient());
    }

    #[test]
    fn rejection_over_http() {
        let tsa = spawn_tsa(|| Reply::Body(status_only_response(2, Some("unaccepted policy"))));

        let client = Client::builder(tsa.url.as_str()).build();
        let err = client.timestamp(b"doc").unwrap_err();

        match err {
            ClientError::Rejected { status, text } => {
                assert_eq!(status, PkiStatus::Rejection);
                assert_eq!(text.as_deref(), Some("unaccepted policy"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn html_body_is_structural() {
        let tsa = spawn_tsa(|| Reply::Body(b"<html>maintenance</html>".to_vec()));

        let client = Client::builder(tsa.url.as_str()).build();
        let err = client.timestamp(b"doc").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Structural);
        assert!(!err.is_transient());
    }

    #[test]
    fn concurrent_requests_share_a_client() {
        let tsa = spawn_tsa(|| Reply::Granted);
        let client = Arc::new(
            Client::builder(tsa.url.as_str())
                .timeout(Duration::from_secs(5))
                .build(),
        );

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let client = client.clone();
                thread::spawn(move || {
                    let content = format!("document {i}");
                    let response = client.timestamp(content.as_bytes()).unwrap();
                    assert_eq!(verify(content.as_bytes(), &response.token), Ok(()));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let mut nonces: Vec<Nonce> = (0..8)
            .map(|_| {
                let captured = tsa.captured.recv_timeout(Duration::from_secs(5)).unwrap();
                parse_request(&captured.body).1
            })
            .collect();
        nonces.sort_by_key(|n| *n.as_bytes());
        nonces.dedup();
        assert_eq!(nonces.len(), 8);
    }
}
