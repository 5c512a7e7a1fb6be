// src/client/panel.rs

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tokio::{sync::watch, task::JoinHandle};

use crate::client::ApiClient;

#[derive(Debug, Clone, PartialEq)]
pub enum PanelState<T> {
    Loading,
    Error(String),
    Empty,
    Ready(T),
}

impl<T> PanelState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PanelState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            PanelState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// Qual carga pode publicar. A tarefa confere e publica segurando este lock;
/// `unmount` também o toma, então nada publica depois que ele retorna.
#[derive(Debug)]
struct Gate {
    generation: u64,
    mounted: bool,
}

/// Um bloco do painel que busca e sanitiza os próprios dados.
///
/// Só a última requisição vale: um novo `load` aborta o anterior e, depois do
/// `unmount`, nenhuma resposta altera o estado. Não há nova tentativa.
pub struct Panel<T> {
    state: Arc<watch::Sender<PanelState<T>>>,
    gate: Arc<Mutex<Gate>>,
    task: Option<JoinHandle<()>>,
}

impl<T> Default for Panel<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Panel<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        let (state, _) = watch::channel(PanelState::Loading);
        Self {
            state: Arc::new(state),
            gate: Arc::new(Mutex::new(Gate { generation: 0, mounted: true })),
            task: None,
        }
    }

    /// `sanitize` devolve `None` quando não há nada para mostrar.
    pub fn load<F>(&mut self, client: &ApiClient, path: &str, sanitize: F)
    where
        F: FnOnce(Value) -> Option<T> + Send + 'static,
    {
        if let Some(previous) = self.task.take() {
            previous.abort();
        }
        let ticket = {
            let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
            gate.mounted = true;
            gate.generation += 1;
            // Dentro do lock: uma carga antiga não pode sobrescrever este Loading
            self.state.send_replace(PanelState::Loading);
            gate.generation
        };

        let client = client.clone();
        let path = path.to_string();
        let state = Arc::clone(&self.state);
        let gate = Arc::clone(&self.gate);

        self.task = Some(tokio::spawn(async move {
            let next = match client.get_value(&path).await {
                Ok(json) => match sanitize(json) {
                    Some(data) => PanelState::Ready(data),
                    None => PanelState::Empty,
                },
                Err(e) => {
                    tracing::warn!("Falha ao carregar {}: {}", path, e);
                    PanelState::Error(e.user_message())
                }
            };

            // Resposta atrasada de uma carga substituída ou de um painel desmontado
            let guard = gate.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.mounted && guard.generation == ticket {
                state.send_replace(next);
            }
        }));
    }

    pub fn unmount(&mut self) {
        self.close();
    }

    pub fn state(&self) -> PanelState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PanelState<T>> {
        self.state.subscribe()
    }
}

impl<T> Panel<T> {
    fn close(&mut self) {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner).mounted = false;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<T> Drop for Panel<T> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::serve;
    use crate::common::sanitize::{list_or_empty, number_or_zero};
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::time::Duration;

    fn numbers(json: Value) -> Option<Vec<f64>> {
        let items: Vec<f64> = list_or_empty(json).iter().map(number_or_zero).collect();
        (!items.is_empty()).then_some(items)
    }

    fn router() -> Router {
        Router::new()
            .route("/list", get(|| async { Json(json!([1, "2", "x", null])) }))
            .route("/object", get(|| async { Json(json!({ "error": "not a list" })) }))
            .route(
                "/fail",
                get(|| async {
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "An unexpected error occurred." })))
                }),
            )
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                    Json(json!([42]))
                }),
            )
    }

    async fn settle(panel: &Panel<Vec<f64>>) -> PanelState<Vec<f64>> {
        let mut rx = panel.subscribe();
        let state = rx.wait_for(|s| !s.is_loading()).await.unwrap().clone();
        state
    }

    #[tokio::test]
    async fn ready_with_sanitized_data() {
        let client = serve(router()).await;
        let mut panel = Panel::new();
        panel.load(&client, "/list", numbers);

        assert_eq!(settle(&panel).await, PanelState::Ready(vec![1.0, 2.0, 0.0, 0.0]));
    }

    #[tokio::test]
    async fn non_array_payload_is_empty() {
        let client = serve(router()).await;
        let mut panel = Panel::new();
        panel.load(&client, "/object", numbers);

        assert_eq!(settle(&panel).await, PanelState::Empty);
    }

    #[tokio::test]
    async fn server_errors_show_the_message() {
        let client = serve(router()).await;
        let mut panel = Panel::new();
        panel.load(&client, "/fail", numbers);

        assert_eq!(
            settle(&panel).await,
            PanelState::Error("An unexpected error occurred.".into())
        );
        assert!(panel.state().data().is_none());
    }

    #[tokio::test]
    async fn unmount_during_fetch_keeps_the_state() {
        let client = serve(router()).await;
        let mut panel = Panel::new();
        panel.load(&client, "/slow", numbers);
        panel.unmount();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(panel.state(), PanelState::Loading);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn nothing_changes_after_unmount_returns() {
        let client = serve(router()).await;

        for _ in 0..200 {
            let mut panel = Panel::new();
            panel.load(&client, "/list", numbers);
            // Deixa a resposta chegar perto do fim da tarefa
            tokio::task::yield_now().await;
            panel.unmount();

            let frozen = panel.state();
            tokio::time::sleep(Duration::from_millis(2)).await;
            assert_eq!(panel.state(), frozen);
        }
    }

    #[tokio::test]
    async fn newer_load_wins() {
        let client = serve(router()).await;
        let mut panel = Panel::new();
        panel.load(&client, "/slow", numbers);
        panel.load(&client, "/list", numbers);

        assert_eq!(settle(&panel).await, PanelState::Ready(vec![1.0, 2.0, 0.0, 0.0]));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(panel.state(), PanelState::Ready(vec![1.0, 2.0, 0.0, 0.0]));
    }
}
