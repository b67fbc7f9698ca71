//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero de 127.0.0.1 y
//! le habla por sockets reales, así que no hace falta `cargo run` aparte.

use routed_http::config::Config;
use routed_http::handlers::{FileHandler, HelloHandler};
use routed_http::http::{Response, StatusCode};
use routed_http::router::{handler_fn, HandlerError};
use routed_http::server::Server;
use std::fs;
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

fn test_config(valid_paths: &[&str]) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        valid_paths: valid_paths.iter().map(|p| p.to_string()).collect(),
        workers: 4,
        queue_capacity: 16,
        read_timeout_ms: 5_000,
        write_timeout_ms: 5_000,
        ..Config::default()
    }
}

/// Arranca el servidor en un thread y retorna su dirección
fn start(server: Server) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind efímero");
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || server.serve(listener));
    addr
}

/// Helper: envía un request crudo y retorna la response completa
fn send_raw(addr: SocketAddr, raw: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.write_all(raw).unwrap();
    stream.shutdown(Shutdown::Write).unwrap();

    read_all(stream)
}

fn read_all(mut stream: TcpStream) -> String {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).expect("leer response");
    String::from_utf8(buf).expect("response UTF-8")
}

fn get(addr: SocketAddr, target: &str) -> String {
    send_raw(addr, format!("GET {} HTTP/1.1\r\n\r\n", target).as_bytes())
}

/// Helper: extrae el body de una response HTTP
fn extract_body(response: &str) -> &str {
    match response.find("\r\n\r\n") {
        Some(pos) => &response[pos + 4..],
        None => "",
    }
}

fn hello_server() -> SocketAddr {
    let mut server = Server::new(test_config(&["/", "/hello"]));
    server.add_handler("GET", "/hello", HelloHandler);
    start(server)
}

#[test]
fn test_hello_endpoint() {
    let addr = hello_server();
    let response = get(addr, "/hello?last=5");

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "got: {}", response);
    assert!(response.contains("Content-Type: text/plain; charset=UTF-8\r\n"));
    assert!(response.contains("Content-Length: 35\r\n"));
    assert!(response.contains("Connection: close\r\n"));
    assert_eq!(extract_body(&response), "Параметр last равен: 5");
}

#[test]
fn test_malformed_request_line() {
    let addr = hello_server();

    for raw in [&b"GET /hello\r\n\r\n"[..], &b"GET  /hello HTTP/1.1\r\n\r\n"[..]] {
        let response = send_raw(addr, raw);
        assert_eq!(
            response,
            "HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        );
    }
}

#[test]
fn test_path_outside_allow_list_is_not_found() {
    let mut server = Server::new(test_config(&["/hello"]));
    server
        .add_handler("GET", "/hello", HelloHandler)
        .add_handler("GET", "/hidden", HelloHandler);
    let addr = start(server);

    let response = get(addr, "/hidden");
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(response.contains("Content-Length: 0\r\n"));
}

#[test]
fn test_allowed_path_without_handler_is_not_found() {
    let addr = hello_server();

    assert!(get(addr, "/").starts_with("HTTP/1.1 404 Not Found\r\n"));
    // El método también es parte de la ruta
    let response = send_raw(addr, b"POST /hello HTTP/1.1\r\nContent-Length: 0\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

#[test]
fn test_query_params_reach_handler() {
    let mut server = Server::new(test_config(&["/q"]));
    server.add_handler(
        "GET",
        "/q",
        handler_fn(|req, out| {
            let body = req.query_param_all("tag").join(",");
            Response::text(StatusCode::Ok, &body).write_to(out)?;
            Ok(())
        }),
    );
    let addr = start(server);

    let response = get(addr, "/q?tag=a&other=1&tag=b%20c");
    assert_eq!(extract_body(&response), "a,b c");
}

#[test]
fn test_headers_and_body_reach_handler() {
    let mut server = Server::new(test_config(&["/echo"]));
    server.add_handler(
        "POST",
        "/echo",
        handler_fn(|req, out| {
            let body = format!(
                "{}:{}",
                req.header_ignore_case("x-name").unwrap_or("-"),
                String::from_utf8_lossy(req.body())
            );
            Response::text(StatusCode::Ok, &body).write_to(out)?;
            Ok(())
        }),
    );
    let addr = start(server);

    let response = send_raw(
        addr,
        b"POST /echo HTTP/1.1\r\nX-Name: ana\r\nContent-Length: 4\r\n\r\nhola",
    );
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(extract_body(&response), "ana:hola");
}

#[test]
fn test_failing_handlers_do_not_stop_server() {
    let mut server = Server::new(test_config(&["/hello", "/fail", "/panic"]));
    server
        .add_handler("GET", "/hello", HelloHandler)
        .add_handler("GET", "/fail", handler_fn(|_req, _out| Err(HandlerError::failed("boom"))))
        .add_handler("GET", "/panic", handler_fn(|_req, _out| panic!("handler roto")));
    let addr = start(server);

    assert!(get(addr, "/fail").starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    assert!(get(addr, "/panic").starts_with("HTTP/1.1 500 Internal Server Error\r\n"));

    let response = get(addr, "/hello?last=ok");
    assert_eq!(extract_body(&response), "Параметр last равен: ok");
}

#[test]
fn test_concurrent_clients() {
    let addr = hello_server();

    let clients: Vec<_> = (0..16)
        .map(|i| thread::spawn(move || (i, get(addr, &format!("/hello?last={}", i)))))
        .collect();

    for client in clients {
        let (i, response) = client.join().unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert_eq!(extract_body(&response), format!("Параметр last равен: {}", i));
    }
}

#[test]
fn test_saturated_pool_returns_503() {
    let (started_tx, started_rx) = crossbeam_channel::unbounded::<()>();
    let (release_tx, release_rx) = crossbeam_channel::unbounded::<()>();

    let mut config = test_config(&["/slow", "/hello"]);
    config.workers = 1;
    config.queue_capacity = 1;

    let mut server = Server::new(config);
    server
        .add_handler("GET", "/hello", HelloHandler)
        .add_handler(
            "GET",
            "/slow",
            handler_fn(move |_req, out| {
                let _ = started_tx.send(());
                let _ = release_rx.recv_timeout(Duration::from_secs(10));
                Response::text(StatusCode::Ok, "listo").write_to(out)?;
                Ok(())
            }),
        );
    let addr = start(server);

    // Ocupa el único worker
    let mut busy = TcpStream::connect(addr).unwrap();
    busy.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
    busy.write_all(b"GET /slow HTTP/1.1\r\n\r\n").unwrap();
    started_rx.recv_timeout(Duration::from_secs(5)).expect("handler iniciado");

    // Ocupa la cola
    let mut queued = TcpStream::connect(addr).unwrap();
    queued.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
    queued.write_all(b"GET /hello?last=2 HTTP/1.1\r\n\r\n").unwrap();

    // No cabe: 503 sin body, sin mandar datos
    let rejected = TcpStream::connect(addr).unwrap();
    rejected.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    let response = read_all(rejected);
    assert_eq!(
        response,
        "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    );

    release_tx.send(()).unwrap();
    assert_eq!(extract_body(&read_all(busy)), "listo");
    assert_eq!(extract_body(&read_all(queued)), "Параметр last равен: 2");
}

#[test]
fn test_file_handler_serves_public_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>hola</h1>").unwrap();
    fs::write(dir.path().join("classic.html"), "<p>{time}</p>").unwrap();

    let mut server = Server::new(test_config(&["/", "/classic.html", "/missing.html"]));
    let files = FileHandler::new(dir.path());
    for path in ["/", "/classic.html", "/missing.html"] {
        server.add_handler("GET", path, files.clone());
    }
    let addr = start(server);

    let index = get(addr, "/");
    assert!(index.contains("Content-Type: text/html; charset=UTF-8\r\n"));
    assert_eq!(extract_body(&index), "<h1>hola</h1>");

    let classic = get(addr, "/classic.html");
    assert!(classic.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(!extract_body(&classic).contains("{time}"));

    assert!(get(addr, "/missing.html").starts_with("HTTP/1.1 404 Not Found\r\n"));
}
