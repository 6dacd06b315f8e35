//! IpcRenderer - lower-trust endpoint of the messaging primitive.
//!
//! Constructed only inside the crate and owned by a bridge, so code that
//! receives a bridge can never reach the raw primitive.

use std::sync::Arc;

use serde_json::Value;

use crate::api::types::ApiError;
use crate::ipc::channel::Channel;
use crate::ipc::main_process::IpcMain;

pub(crate) struct IpcRenderer {
    main: Arc<IpcMain>,
}

impl IpcRenderer {
    pub(crate) fn new(main: Arc<IpcMain>) -> Self {
        Self { main }
    }

    /// One request/response exchange with the privileged side.
    pub(crate) async fn invoke(&self, channel: Channel, payload: Value) -> Result<Value, ApiError> {
        self.main.dispatch(channel, payload).await
    }

    /// Append a listener for emissions on a channel. There is no removal.
    pub(crate) fn on<F>(&self, channel: Channel, listener: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.main.add_listener(channel, Arc::new(listener));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::main_process::handler_fn;
    use serde_json::json;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_invoke_forwards_payload() {
        let main = IpcMain::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handler_seen = Arc::clone(&seen);
        main.handle(
            Channel::ReadFile,
            handler_fn(move |payload| {
                let handler_seen = Arc::clone(&handler_seen);
                async move {
                    handler_seen.lock().unwrap().push(payload);
                    Ok(json!("content"))
                }
            }),
        )
        .unwrap();

        let renderer = main.renderer();
        let response = renderer
            .invoke(Channel::ReadFile, json!({ "path": "x" }))
            .await
            .unwrap();

        assert_eq!(response, json!("content"));
        assert_eq!(*seen.lock().unwrap(), vec![json!({ "path": "x" })]);
    }

    #[test]
    fn test_on_receives_emissions() {
        let main = IpcMain::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let listener_received = Arc::clone(&received);

        main.renderer().on(Channel::Update, move |payload| {
            listener_received.lock().unwrap().push(payload.clone());
        });

        main.send(Channel::Update, json!({ "n": 1 }));
        main.send(Channel::Update, json!({ "n": 2 }));

        assert_eq!(
            *received.lock().unwrap(),
            vec![json!({ "n": 1 }), json!({ "n": 2 })]
        );
    }
}
