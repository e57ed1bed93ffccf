use anyhow::{anyhow, Result};
use rust_bert::pipelines::common::{ModelResource, ModelType};
use rust_bert::pipelines::sequence_classification::{
    SequenceClassificationConfig, SequenceClassificationModel,
};
use rust_bert::resources::RemoteResource;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use super::classification::{Classification, Classifier, ClassifierError};
use crate::settings::{Architecture, ModelSpec};
use crate::utils::{log_ml_model_loaded, log_ml_step};

type Reply = Result<Classification, ClassifierError>;

enum MLRequest {
    Classify {
        text: String,
        response_tx: mpsc::Sender<Reply>,
    },
}

/// A sequence-classification model living on its own thread. Clones share
/// the worker.
#[derive(Clone)]
pub struct MLHandle {
    request_tx: mpsc::Sender<MLRequest>,
    timeout: Duration,
}

impl MLHandle {
    /// Loads the model and blocks until it is ready. A load failure is an
    /// error here; callers treat it as the classifier being unavailable.
    pub fn spawn(spec: &ModelSpec, timeout_ms: u64) -> Result<Self> {
        let name = spec.display_name();
        let spec = spec.clone();
        let (request_tx, request_rx) = mpsc::channel::<MLRequest>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

        let worker_name = name.clone();
        thread::Builder::new()
            .name(format!("ml-{worker_name}"))
            .spawn(move || {
                log_ml_step(&format!("Loading {worker_name}..."));
                let start = Instant::now();
                let model = match SequenceClassificationModel::new(build_config(&spec)) {
                    Ok(model) => model,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                log_ml_model_loaded(&worker_name, start.elapsed().as_secs_f32());
                let _ = ready_tx.send(Ok(()));
                run_ml_worker(&model, request_rx);
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                request_tx,
                timeout: Duration::from_millis(timeout_ms),
            }),
            Ok(Err(e)) => Err(anyhow!("loading {name}: {e}")),
            Err(_) => Err(anyhow!("{name} worker exited before loading")),
        }
    }
}

impl Classifier for MLHandle {
    fn classify(&self, text: &str) -> Reply {
        let (response_tx, response_rx) = mpsc::channel();

        self.request_tx
            .send(MLRequest::Classify {
                text: text.to_string(),
                response_tx,
            })
            .map_err(|_| ClassifierError::WorkerGone)?;

        match response_rx.recv_timeout(self.timeout) {
            Ok(reply) => reply,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Err(ClassifierError::Timeout(self.timeout.as_millis() as u64))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(ClassifierError::WorkerGone),
        }
    }
}

fn run_ml_worker(model: &SequenceClassificationModel, request_rx: mpsc::Receiver<MLRequest>) {
    for request in request_rx {
        let MLRequest::Classify { text, response_tx } = request;
        let _ = response_tx.send(classify_text(model, &text));
    }
}

fn classify_text(model: &SequenceClassificationModel, text: &str) -> Reply {
    let predicted = panic::catch_unwind(AssertUnwindSafe(|| model.predict([text])))
        .map_err(|_| ClassifierError::Inference("model panicked on input".to_string()))?;

    best_label(predicted.into_iter().map(|l| (l.text, l.score)))
}

fn best_label(labels: impl IntoIterator<Item = (String, f64)>) -> Reply {
    labels
        .into_iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(label, score)| Classification::new(label, score as f32))
        .ok_or(ClassifierError::EmptyOutput)
}

fn build_config(spec: &ModelSpec) -> SequenceClassificationConfig {
    match spec {
        ModelSpec::DistilBertSst2 => SequenceClassificationConfig::default(),
        ModelSpec::Remote {
            name,
            architecture,
            model_url,
            config_url,
            vocab_url,
            lower_case,
        } => SequenceClassificationConfig::new(
            architecture.model_type(),
            ModelResource::Torch(Box::new(RemoteResource::new(
                model_url,
                &format!("{name}/model"),
            ))),
            RemoteResource::new(config_url, &format!("{name}/config")),
            RemoteResource::new(vocab_url, &format!("{name}/vocab")),
            None,
            *lower_case,
            None::<bool>,
            None::<bool>,
        ),
    }
}

impl Architecture {
    pub fn model_type(self) -> ModelType {
        match self {
            Architecture::Bert => ModelType::Bert,
            Architecture::DistilBert => ModelType::DistilBert,
            Architecture::Roberta => ModelType::Roberta,
        }
    }
}

impl ModelSpec {
    pub fn display_name(&self) -> String {
        match self {
            ModelSpec::DistilBertSst2 => "distilbert-sst2".to_string(),
            ModelSpec::Remote { name, .. } => name.clone(),
        }
    }
}
