use tokio::sync::oneshot;
use tokio::sync::oneshot::Receiver;
use tokio::sync::oneshot::Sender;

use crate::engine::entry::Order;
use crate::engine::matchlogic::MatchReport;
use crate::error::EngineError;

pub type MatchResult = Result<MatchReport, EngineError>;

/// An order on its way to a book, with the sender that resolves its receipt
#[derive(Debug)]
pub struct Submission {
    pub order: Order,
    completion: Option<Sender<MatchResult>>,
}

impl Submission {
    pub fn new(order: Order) -> (Self, Receipt) {
        let (tx, rx) = oneshot::channel();
        let submission = Submission {
            order,
            completion: Some(tx),
        };
        (submission, Receipt { rx })
    }

    pub(crate) fn into_parts(mut self) -> (Order, Completion) {
        let completion = Completion(self.completion.take());
        (self.order, completion)
    }

    /// Resolves the receipt without processing the order
    pub(crate) fn fail(self, error: EngineError) {
        let (_, completion) = self.into_parts();
        completion.complete(Err(error));
    }
}

pub(crate) struct Completion(Option<Sender<MatchResult>>);

impl Completion {
    pub(crate) fn complete(mut self, result: MatchResult) {
        if let Some(sender) = self.0.take() {
            // the submitter may have stopped waiting
            let _ = sender.send(result);
        }
    }
}

/// Completion handle for one submitted order
///
/// Resolves once the book has finished the order's processing pass, whether
/// it matched fully, partially or not at all.
#[derive(Debug)]
pub struct Receipt {
    rx: Receiver<MatchResult>,
}

impl Receipt {
    pub async fn wait(self) -> MatchResult {
        self.rx.await.map_err(|_| EngineError::Dropped)?
    }
}
