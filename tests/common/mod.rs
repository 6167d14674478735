//! Shared helpers: real servers bound to ephemeral localhost ports.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use user_replication::server::{self, principal_router, replication_router};
use user_replication::{PrincipalStore, ReplicaConfig, ReplicationAgent};

/// A server running on a background task, stopped on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

async fn spawn_router(router: axum::Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown = async move {
            let _ = stopped.await;
        };
        server::serve(listener, router, shutdown).await.unwrap();
    });

    TestServer {
        addr,
        stop: Some(stop),
    }
}

/// Serves an arbitrary router, used to fake a misbehaving principal.
pub async fn spawn_custom(router: axum::Router) -> TestServer {
    spawn_router(router).await
}

pub async fn spawn_principal() -> (TestServer, Arc<PrincipalStore>) {
    let store = Arc::new(PrincipalStore::new());
    let server = spawn_router(principal_router(Arc::clone(&store))).await;
    (server, store)
}

pub async fn spawn_replica(principal_url: &str) -> (TestServer, Arc<ReplicationAgent>) {
    let config = ReplicaConfig::for_testing(principal_url);
    let agent = Arc::new(ReplicationAgent::new(&config).unwrap());
    let server = spawn_router(replication_router(Arc::clone(&agent))).await;
    (server, agent)
}

/// A URL on which nothing is listening.
pub async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
