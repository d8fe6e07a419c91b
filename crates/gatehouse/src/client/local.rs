//! In-process service that speaks the [`tcp`](super::tcp) protocol.
//!
//! Binds `127.0.0.1` on a free port and accepts a single username/password
//! pair. Meant for tests and local experiments; the listener thread is
//! detached and lives until the process exits.

use super::tcp::{read_line, write_line, Reply, Request};
use std::io::{self, BufReader};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::trace;

#[derive(Debug, Clone)]
struct Account {
    username: String,
    password: String,
}

pub struct LocalService {
    port: u16,
    logins: Arc<AtomicUsize>,
}

impl LocalService {
    pub fn start(username: &str, password: &str) -> io::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0))?;
        let port = listener.local_addr()?.port();
        let logins = Arc::new(AtomicUsize::new(0));
        let account = Account {
            username: username.to_string(),
            password: password.to_string(),
        };

        let counter = Arc::clone(&logins);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let account = account.clone();
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    let _ = serve(stream, &account, &counter);
                });
            }
        });

        Ok(Self { port, logins })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Login requests received so far, accepted or not.
    pub fn login_attempts(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }
}

fn serve(stream: TcpStream, account: &Account, logins: &AtomicUsize) -> io::Result<()> {
    let mut writer = stream.try_clone()?;
    let mut reader = BufReader::new(stream);
    let mut authenticated = false;

    loop {
        let request: Request = match read_line(&mut reader) {
            Ok(request) => request,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Err(e) => return Err(e),
        };
        let reply = match request {
            Request::Login {
                username, password, ..
            } => {
                let n = logins.fetch_add(1, Ordering::SeqCst) + 1;
                authenticated = username == account.username && password == account.password;
                trace!(%username, accepted = authenticated, "local login");
                if authenticated {
                    Reply::Ok {
                        token: Some(format!("local-{:04}", n)),
                    }
                } else {
                    Reply::Denied {
                        message: "invalid username/password combination".to_string(),
                    }
                }
            }
            Request::Ping if authenticated => Reply::Ok { token: None },
            Request::Ping => Reply::Error {
                message: "not logged in".to_string(),
            },
        };
        write_line(&mut writer, &reply)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TcpClient;
    use crate::session::{ConnectParams, ServiceClient};

    #[test]
    fn test_counts_login_attempts() {
        let service = LocalService::start("admin", "admin").unwrap();
        let client = TcpClient::new();
        for password in ["bad", "admin"] {
            let _ = client.connect(&ConnectParams {
                host: "127.0.0.1",
                port: service.port(),
                username: "admin",
                password,
                environment: "",
            });
        }
        assert_eq!(service.login_attempts(), 2);
    }
}
