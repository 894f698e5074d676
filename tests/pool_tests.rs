//! Connection Pool Tests
//!
//! Reuse, eviction, replacement of dead entries and shutdown.

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use common::{read_request, unused_addr, StubPeer};
use rmq_remoting::{Command, Config, ConnectionPool, RemotingError, RequestCode};

fn wait_until(cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    cond()
}

#[test]
fn test_close_empty_pool() {
    let pool = ConnectionPool::new(Config::default());
    assert!(pool.is_empty());
    pool.close();
    assert!(pool.is_closed());
}

#[test]
fn test_reuses_healthy_connection() {
    let peer = StubPeer::echo();
    let pool = ConnectionPool::new(Config::default());

    let first = pool.get_or_create(peer.addr()).unwrap();
    let second = pool.get_or_create(peer.addr()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.addresses(), vec![peer.addr().to_string()]);
    assert!(wait_until(|| peer.accepted() == 1));
}

#[test]
fn test_remove_forces_new_connection() {
    let peer = StubPeer::echo();
    let pool = ConnectionPool::new(Config::default());

    let first = pool.get_or_create(peer.addr()).unwrap();
    assert!(pool.remove(peer.addr()));
    assert!(!first.is_connected());
    assert!(pool.is_empty());

    let second = pool.get_or_create(peer.addr()).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(second.is_connected());
    assert!(wait_until(|| peer.accepted() == 2));
}

#[test]
fn test_remove_unknown_address() {
    let pool = ConnectionPool::new(Config::default());
    assert!(!pool.remove("127.0.0.1:1"));
}

#[test]
fn test_dead_connection_replaced() {
    // First connection is hung up after one request; later ones echo
    let peer = StubPeer::spawn(|mut stream| {
        while let Some(request) = read_request(&mut stream) {
            if request.ext_field("hangup").is_some() {
                return;
            }
            let response = Command::response(0, request.opaque());
            if rmq_remoting::protocol::write_command(&mut stream, &response).is_err() {
                return;
            }
        }
    });
    let pool = ConnectionPool::new(Config::default());

    let first = pool.get_or_create(peer.addr()).unwrap();
    let hangup = Command::request(
        RequestCode::GET_BROKER_CLUSTER_INFO,
        HashMap::from([("hangup".to_string(), "1".to_string())]),
    );
    let deadline = Instant::now() + Duration::from_secs(3);
    assert!(first.invoke_sync(&hangup, deadline).is_err());
    assert!(wait_until(|| !first.is_connected()));

    let second = pool.get_or_create(peer.addr()).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(pool.len(), 1);

    let request = Command::request(RequestCode::GET_BROKER_CLUSTER_INFO, HashMap::new());
    let response = second
        .invoke_sync(&request, Instant::now() + Duration::from_secs(3))
        .unwrap();
    assert_eq!(response.opaque(), request.opaque());
}

#[test]
fn test_concurrent_get_or_create_dials_once() {
    let peer = StubPeer::echo();
    let pool = Arc::new(ConnectionPool::new(Config::default()));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let barrier = Arc::clone(&barrier);
            let addr = peer.addr().to_string();
            thread::spawn(move || {
                barrier.wait();
                pool.get_or_create(&addr).unwrap()
            })
        })
        .collect();

    let connections: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for connection in &connections[1..] {
        assert!(Arc::ptr_eq(&connections[0], connection));
    }

    thread::sleep(Duration::from_millis(100));
    assert_eq!(peer.accepted(), 1);
}

#[test]
fn test_connect_failure_leaves_no_entry() {
    let pool = ConnectionPool::new(Config::builder().connect_timeout_ms(500).build());
    let addr = unused_addr();

    let err = pool.get_or_create(&addr).unwrap_err();
    assert!(matches!(err, RemotingError::Connect { .. }));
    assert!(pool.is_empty());
}

#[test]
fn test_close_tears_down_everything() {
    let peer_a = StubPeer::echo();
    let peer_b = StubPeer::echo();
    let pool = ConnectionPool::new(Config::default());

    let a = pool.get_or_create(peer_a.addr()).unwrap();
    let b = pool.get_or_create(peer_b.addr()).unwrap();
    assert_eq!(pool.len(), 2);

    pool.close();

    assert!(pool.is_empty());
    assert!(!a.is_connected());
    assert!(!b.is_connected());
    assert!(matches!(pool.get_or_create(peer_a.addr()), Err(RemotingError::PoolClosed)));
}
