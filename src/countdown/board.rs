use std::collections::BTreeMap;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::timer::Countdown;
use crate::events::Event;
use crate::state::ShopEvent;

struct Card {
    countdown: Countdown,
    last_display: Option<String>,
}

/// Every countdown visible on a page, driven by one shared clock.
///
/// Countdowns are keyed by event id. Re-watching an event whose deadline
/// changed swaps in a fresh countdown; the old one is dropped as is.
#[derive(Default)]
pub struct CountdownBoard {
    cards: BTreeMap<String, Card>,
    hide_on_expire: bool,
}

impl CountdownBoard {
    pub fn new(hide_on_expire: bool) -> Self {
        Self {
            cards: BTreeMap::new(),
            hide_on_expire,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn countdown(&self, event_id: &str) -> Option<&Countdown> {
        self.cards.get(event_id).map(|card| &card.countdown)
    }

    /// Start showing a countdown for `event`, evaluated right away so an
    /// already-finished event reports expiry without waiting for a tick.
    pub fn watch(&mut self, event: &ShopEvent, now_ms: i64) -> Vec<Event> {
        let finish_ms = event.finish_ms();
        if finish_ms.is_none() {
            warn!(
                event_id = %event.id,
                raw = ?event.finish_date,
                "Unparseable finish date, treating as expired"
            );
        }

        if let Some(card) = self.cards.get(&event.id) {
            if card.countdown.finish_ms() == finish_ms {
                return Vec::new();
            }
            info!(event_id = %event.id, "Deadline changed, re-arming countdown");
        }

        let countdown = Countdown::new(event.id.clone(), finish_ms, now_ms)
            .hide_on_expire(self.hide_on_expire);
        self.cards.insert(
            event.id.clone(),
            Card {
                countdown,
                last_display: None,
            },
        );

        let mut out = Vec::new();
        if let Some(card) = self.cards.get_mut(&event.id) {
            evaluate(card, now_ms, &mut out);
        }
        out
    }

    /// Stop showing a countdown. Returns false if it was not on the board.
    pub fn unwatch(&mut self, event_id: &str) -> bool {
        self.cards.remove(event_id).is_some()
    }

    /// Evaluate every countdown against one clock reading.
    /// Display events are only emitted when the text changed.
    pub fn on_tick(&mut self, now_ms: i64) -> Vec<Event> {
        let mut out = Vec::new();
        for card in self.cards.values_mut() {
            evaluate(card, now_ms, &mut out);
        }
        out
    }

    /// Spawns a task that feeds clock ticks through the board and forwards
    /// the resulting events. Ends when the clock or the receiver goes away.
    pub fn spawn(
        mut self,
        mut ticks: broadcast::Receiver<i64>,
        tx: mpsc::Sender<Event>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let now_ms = match ticks.recv().await {
                    Ok(now_ms) => now_ms,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!("[countdown] Skipped {} ticks", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                for event in self.on_tick(now_ms) {
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
            }
            debug!("[countdown] Clock closed, board stopped");
        })
    }
}

fn evaluate(card: &mut Card, now_ms: i64, out: &mut Vec<Event>) {
    let tick = card.countdown.tick(now_ms);
    let display = card.countdown.render(tick.remaining);
    let event_id = card.countdown.event_id().to_string();

    if display != card.last_display {
        if let Some(text) = &display {
            out.push(Event::Countdown {
                event_id: event_id.clone(),
                display: text.clone(),
            });
        }
        card.last_display = display;
    }

    if tick.just_expired {
        info!(event_id = %event_id, "Event expired");
        out.push(Event::Expired { event_id });
    }
}
