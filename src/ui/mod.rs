pub mod theme;

use crate::app::{AppState, ClientHandle, ClientUpdate, Operation, WaveEvent};
use crate::theme::ThemeStore;
use crate::wallet::{short_address, FilePreferenceStore, WaveRecord};
use chrono::Local;
use futures::channel::mpsc::UnboundedReceiver;
use futures::StreamExt;
use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::button::{Button, ButtonVariants};
use gpui_component::input::{Input, InputEvent, InputState};
use gpui_component::{h_flex, v_flex, Disableable};
use std::collections::HashSet;
use theme::Palette;
use tracing::warn;
use uuid::Uuid;

pub struct MainWindow {
    state: AppState,
    client: ClientHandle,
    input: Entity<InputState>,
    theme: ThemeStore<FilePreferenceStore>,
    palette: Palette,
    /// Set between clicking "Wave at Me" and the client finishing with it
    awaiting_submit: bool,
    dismissed: HashSet<Uuid>,
    _subscriptions: Vec<Subscription>,
}

impl MainWindow {
    pub fn new(
        window: &mut Window,
        cx: &mut Context<Self>,
        client: ClientHandle,
        mut updates: UnboundedReceiver<ClientUpdate>,
        theme: ThemeStore<FilePreferenceStore>,
    ) -> Self {
        let input = cx.new(|cx| InputState::new(window, cx).placeholder("Write your message"));

        let subscriptions = vec![cx.subscribe_in(
            &input,
            window,
            |this, _input, event: &InputEvent, window, cx| {
                if let InputEvent::PressEnter { .. } = event {
                    this.submit(window, cx);
                }
            },
        )];

        cx.spawn_in(window, async move |this, cx| {
            while let Some(update) = updates.next().await {
                let applied = this.update_in(cx, |view, window, cx| {
                    view.apply_update(update, window, cx);
                });
                if applied.is_err() {
                    break;
                }
            }
        })
        .detach();

        let palette = Palette::for_mode(theme.mode());
        Self {
            state: AppState::default(),
            client,
            input,
            theme,
            palette,
            awaiting_submit: false,
            dismissed: HashSet::new(),
            _subscriptions: subscriptions,
        }
    }

    fn apply_update(&mut self, update: ClientUpdate, window: &mut Window, cx: &mut Context<Self>) {
        match update {
            ClientUpdate::Snapshot(state) => self.state = *state,
            ClientUpdate::Event(WaveEvent::Reloaded) => {
                self.awaiting_submit = false;
                self.input
                    .update(cx, |input, cx| input.set_value("", window, cx));
            }
            ClientUpdate::Event(WaveEvent::OperationFailed {
                operation: Operation::SubmitWave,
                ..
            }) => {
                self.awaiting_submit = false;
            }
            ClientUpdate::Event(_) => {}
        }
        cx.notify();
    }

    fn submit(&mut self, _window: &mut Window, cx: &mut Context<Self>) {
        if self.awaiting_submit {
            return;
        }
        let draft = self.input.read(cx).value().to_string();
        if draft.trim().is_empty() {
            return;
        }
        self.awaiting_submit = true;
        self.client.submit_wave(draft);
        cx.notify();
    }

    fn toggle_theme(&mut self, cx: &mut Context<Self>) {
        match self.theme.toggle() {
            Ok(mode) => self.palette = Palette::for_mode(mode),
            Err(e) => warn!(error = %e, "Could not persist theme preference"),
        }
        cx.notify();
    }

    fn render_toolbar(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let label = if self.palette.mode.is_dark() {
            "Light mode"
        } else {
            "Dark mode"
        };

        h_flex()
            .w_full()
            .justify_end()
            .gap(px(8.0))
            .when(self.state.account.is_some(), |this| {
                this.child(
                    Button::new("refresh")
                        .label("Refresh")
                        .ghost()
                        .on_click(cx.listener(|this, _, _, _| this.client.refresh())),
                )
            })
            .child(
                Button::new("theme-toggle")
                    .label(label)
                    .ghost()
                    .on_click(cx.listener(|this, _, _, cx| this.toggle_theme(cx))),
            )
    }

    fn render_notice(&self, cx: &mut Context<Self>) -> Option<impl IntoElement> {
        let notice = self
            .state
            .latest_notification()
            .filter(|n| !self.dismissed.contains(&n.id))?;
        let id = notice.id;

        Some(
            h_flex()
                .w_full()
                .justify_between()
                .items_center()
                .p(px(8.0))
                .rounded(px(8.0))
                .border_1()
                .border_color(self.palette.border)
                .text_color(self.palette.notification(notice.kind))
                .child(notice.message.clone())
                .child(
                    Button::new("dismiss-notice")
                        .label("Dismiss")
                        .ghost()
                        .on_click(cx.listener(move |this, _, _, cx| {
                            this.dismissed.insert(id);
                            cx.notify();
                        })),
                ),
        )
    }

    fn render_wave(&self, wave: &WaveRecord) -> impl IntoElement {
        let time = wave
            .timestamp
            .with_timezone(&Local)
            .format("%a %b %d %Y %H:%M:%S %Z");

        v_flex()
            .mt(px(16.0))
            .p(px(8.0))
            .rounded(px(4.0))
            .bg(self.palette.card_bg)
            .text_color(self.palette.card_text)
            .child(format!("Address: {}", wave.sender))
            .child(format!("Time: {time}"))
            .child(format!("Message: {}", wave.message))
    }

    fn render_status(&self) -> Option<impl IntoElement> {
        let text = if self.state.mining {
            let hash = self
                .state
                .pending_tx
                .map(|h| h.to_string())
                .unwrap_or_default();
            format!("Mining... {hash}")
        } else if let Some(account) = &self.state.account {
            format!("Connected as {}", short_address(account))
        } else if let Some(error) = &self.state.last_error {
            error.to_string()
        } else {
            return None;
        };

        Some(
            div()
                .text_sm()
                .text_color(self.palette.text_secondary)
                .child(text),
        )
    }
}

impl Render for MainWindow {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let connected = self.state.account.is_some();
        let mining = self.state.mining;
        let can_wave = self.state.can_submit() && !self.awaiting_submit;

        let waves: Vec<_> = self
            .state
            .waves_newest_first()
            .map(|wave| self.render_wave(wave))
            .collect();

        div()
            .id("main")
            .size_full()
            .overflow_y_scroll()
            .bg(self.palette.background)
            .text_color(self.palette.text_primary)
            .child(
                v_flex()
                    .w(px(600.0))
                    .mx_auto()
                    .p(px(32.0))
                    .gap(px(16.0))
                    .child(self.render_toolbar(cx))
                    .child(
                        div()
                            .text_2xl()
                            .font_weight(FontWeight::BOLD)
                            .child("👋 Hey there!"),
                    )
                    .child(
                        div()
                            .text_color(self.palette.text_secondary)
                            .child("Connect your Ethereum wallet and wave at me with a message!"),
                    )
                    .when(!connected, |this| {
                        this.child(
                            Button::new("connect")
                                .label("Connect Wallet")
                                .primary()
                                .on_click(cx.listener(|this, _, _, _| this.client.connect())),
                        )
                    })
                    .children(self.render_notice(cx))
                    .child(Input::new(&self.input))
                    .child(
                        Button::new("wave")
                            .label(if mining { "Mining..." } else { "Wave at Me" })
                            .primary()
                            .loading(mining)
                            .disabled(!can_wave)
                            .on_click(cx.listener(|this, _, window, cx| this.submit(window, cx))),
                    )
                    .children(self.render_status())
                    .children(waves),
            )
    }
}
