#[macro_use]
extern crate serde_json;
extern crate sfxpipe;
extern crate tiny_http;

mod integration {
    mod forward {

        use serde_json;
        use sfxpipe::config::Config;
        use sfxpipe::pipeline::{forward, Error};
        use sfxpipe::sink;
        use sfxpipe::sink::SignalFxConfig;
        use std::io::{Cursor, Read};
        use std::net::TcpListener;
        use std::sync::mpsc;
        use std::thread;
        use tiny_http;

        struct Captured {
            method: String,
            url: String,
            token: Option<String>,
            user_agent: Option<String>,
            content_type: Option<String>,
            body: serde_json::Value,
        }

        fn header(request: &tiny_http::Request, name: &'static str) -> Option<String> {
            request
                .headers()
                .iter()
                .find(|h| h.field.equiv(name))
                .map(|h| h.value.to_string())
        }

        /// Serve exactly one request, answering with `status`, and hand back
        /// what was received.
        fn serve_once(status: u16) -> (String, mpsc::Receiver<Captured>) {
            let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
            let endpoint = format!("http://{}/v2/datapoint", server.server_addr());
            let (snd, rcv) = mpsc::channel();
            thread::spawn(move || {
                let mut request = server.recv().unwrap();
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body).unwrap();
                let captured = Captured {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    token: header(&request, "X-SF-Token"),
                    user_agent: header(&request, "User-Agent"),
                    content_type: header(&request, "Content-Type"),
                    body: serde_json::from_str(&body).unwrap(),
                };
                let response = tiny_http::Response::from_string("\"OK\"")
                    .with_status_code(tiny_http::StatusCode(status));
                let _ = request.respond(response);
                snd.send(captured).unwrap();
            });
            (endpoint, rcv)
        }

        fn closed_endpoint() -> String {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let port = listener.local_addr().unwrap().port();
            drop(listener);
            format!("http://127.0.0.1:{}/v2/datapoint", port)
        }

        fn config(endpoint: String, user_agent: Option<&str>) -> Config {
            let mut signalfx = SignalFxConfig::new("t0k3n");
            signalfx.endpoint = Some(endpoint);
            signalfx.user_agent = user_agent.map(|s| s.to_string());
            Config { signalfx: signalfx }
        }

        #[test]
        fn test_forward_posts_batch() {
            let (endpoint, rcv) = serve_once(200);
            let input = concat!(
                r#"{"name":"cpu usage","fields":{"value":42.5},"tags":{"host":"a"},"timestamp":1000}"#,
                "\n",
                r#"{"name":"mem","fields":{"used":7,"state":"ok"},"tags":{},"timestamp":2000}"#,
                "\n"
            );

            let sent = forward(&config(endpoint, Some("telegraf-test")), Cursor::new(input))
                .unwrap();
            assert_eq!(2, sent);

            let captured = rcv.recv().unwrap();
            assert_eq!("POST", captured.method);
            assert_eq!("/v2/datapoint", captured.url);
            assert_eq!(Some("t0k3n".to_string()), captured.token);
            assert_eq!(Some("telegraf-test".to_string()), captured.user_agent);
            assert!(captured.content_type.unwrap().starts_with("application/json"));
            assert_eq!(
                captured.body,
                json!({
                    "gauge": [
                        {
                            "metric": "cpu_usage",
                            "value": 42.5,
                            "dimensions": {"host": "a"},
                            "timestamp": 1_000_000
                        },
                        {
                            "metric": "mem.used",
                            "value": 7,
                            "dimensions": {},
                            "timestamp": 2_000_000
                        }
                    ]
                })
            );
        }

        #[test]
        fn test_forward_default_user_agent() {
            let (endpoint, rcv) = serve_once(200);
            let input = "{\"name\":\"x\",\"fields\":{\"value\":1},\"timestamp\":1}\n";

            forward(&config(endpoint, None), Cursor::new(input)).unwrap();

            let captured = rcv.recv().unwrap();
            assert!(captured.user_agent.unwrap().starts_with("sfxpipe/"));
        }

        #[test]
        fn test_forward_rejected() {
            let (endpoint, rcv) = serve_once(401);
            let input = "{\"name\":\"x\",\"fields\":{\"value\":1},\"timestamp\":1}\n";

            match forward(&config(endpoint, None), Cursor::new(input)) {
                Err(Error::Sink(sink::Error::Rejected { status, .. })) => assert_eq!(401, status),
                other => panic!("unexpected {:?}", other),
            }
            assert!(rcv.recv().is_ok());
        }

        #[test]
        fn test_forward_decode_error_before_send() {
            // Nothing listens on the endpoint; reaching the network would
            // surface as a sink error instead.
            let input = "{\"name\":\"x\",\"fields\":{\"value\":1},\"timestamp\":1}\nnot json\n";

            match forward(&config(closed_endpoint(), None), Cursor::new(input)) {
                Err(Error::Decode(e)) => assert_eq!("not json", e.line),
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        fn test_forward_empty_input_is_noop() {
            let sent = forward(&config(closed_endpoint(), None), Cursor::new("")).unwrap();
            assert_eq!(0, sent);
        }

        #[test]
        fn test_forward_only_unsupported_fields_is_noop() {
            let input = "{\"name\":\"x\",\"fields\":{\"state\":\"ok\",\"up\":true},\"timestamp\":1}\n";
            let sent = forward(&config(closed_endpoint(), None), Cursor::new(input)).unwrap();
            assert_eq!(0, sent);
        }

        #[test]
        fn test_forward_bad_endpoint() {
            match forward(&config("nope".to_string(), None), Cursor::new("")) {
                Err(Error::Sink(sink::Error::Connect(_))) => {}
                other => panic!("unexpected {:?}", other),
            }
        }
    }
}
