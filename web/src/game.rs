use crate::utils::*;
use gloo::timers::callback::Timeout;
use recall_core as game;
use yew::html::Scope;
use yew::prelude::*;

/// What the grid currently displays, kept in sync through the engine's notifications.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BoardModel {
    shown: game::Pattern,
    input_enabled: bool,
    message: Option<game::Verdict>,
}

impl BoardModel {
    fn new(size: game::Coord) -> Self {
        Self {
            shown: game::Pattern::empty(size),
            input_enabled: false,
            message: None,
        }
    }

    fn is_shown(&self, coords: game::Coord2) -> bool {
        self.shown.is_marked(coords)
    }

    fn is_message_hidden(&self, verdict: game::Verdict) -> bool {
        self.message != Some(verdict)
    }
}

impl game::RoundObserver for BoardModel {
    fn on_reveal(&mut self, target: &game::Pattern) {
        self.shown = target.clone();
        self.input_enabled = false;
    }

    fn on_hide_reveal(&mut self, selection: &game::Pattern) {
        self.shown = selection.clone();
        self.input_enabled = true;
    }

    fn on_selection_changed(&mut self, selection: &game::Pattern) {
        self.shown = selection.clone();
    }

    fn on_win(&mut self) {
        self.message = Some(game::Verdict::Won);
        self.input_enabled = false;
    }

    fn on_lose(&mut self) {
        self.message = Some(game::Verdict::Lost);
        self.input_enabled = false;
    }

    fn on_restart(&mut self) {
        self.message = None;
    }
}

/// Schedules reveal timers as browser timeouts; dropping the returned [`Timeout`] clears it.
pub(crate) struct TimeoutScheduler {
    link: Scope<GameView>,
}

impl game::RevealScheduler for TimeoutScheduler {
    type Pending = Timeout;

    fn schedule(&mut self, round: game::RoundId, delay_ms: u32) -> Self::Pending {
        let link = self.link.clone();
        log::trace!("round {} reveal timer: {}ms", round.get(), delay_ms);
        Timeout::new(delay_ms, move || link.send_message(Msg::RevealElapsed(round)))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Select(game::Coord2),
    RevealElapsed(game::RoundId),
    Restart,
}

#[derive(Properties, Clone, PartialEq)]
struct TileProps {
    row: game::Coord,
    col: game::Coord,
    selected: bool,
    #[prop_or_default]
    locked: bool,
    callback: Callback<game::Coord2>,
}

#[function_component(TileView)]
fn tile_component(props: &TileProps) -> Html {
    let TileProps {
        row,
        col,
        selected,
        locked,
        callback,
    } = props.clone();

    let class = classes!(
        "recall-grid-tile",
        selected.then_some("is-selected"),
        locked.then_some("is-locked")
    );

    let onclick = Callback::from(move |_: MouseEvent| {
        if locked {
            log::trace!("({}, {}) click while locked", row, col);
            return;
        }
        callback.emit((row, col));
    });

    html! {
        <div {class} {onclick}/>
    }
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    pub config: game::RoundConfig,
    #[prop_or_default]
    pub seed: Option<u64>,
    #[prop_or_default]
    pub sampling: game::Sampling,
}

pub(crate) struct GameView {
    engine: game::RecallEngine<TimeoutScheduler, BoardModel>,
}

impl GameView {
    fn board(&self) -> &BoardModel {
        self.engine.observer()
    }

    fn view_message(
        &self,
        ctx: &Context<Self>,
        verdict: game::Verdict,
        text: &'static str,
        button: &'static str,
    ) -> Html {
        let class = classes!(
            "recall-message",
            match verdict {
                game::Verdict::Won => "recall-win-message",
                game::Verdict::Lost => "recall-lose-message",
            },
            self.board().is_message_hidden(verdict).then_some("is-hidden")
        );
        let onclick = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::Restart
        });

        html! {
            <div {class}>
                {text}
                <button class="recall-restart-btn" {onclick}>{button}</button>
            </div>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let GameProps {
            config,
            seed,
            sampling,
        } = ctx.props().clone();
        let seed = seed.unwrap_or_else(js_random_seed);
        log::debug!("seed: {}", seed);

        let scheduler = TimeoutScheduler {
            link: ctx.link().clone(),
        };
        let mut engine =
            game::RecallEngine::new(config, seed, scheduler, BoardModel::new(config.size()))
                .with_sampling(sampling);
        engine.start();

        Self { engine }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Select(pos) => {
                let outcome = self.engine.select(pos);
                log::debug!("select {:?}: {:?}", pos, outcome);
                if let Some(verdict) = outcome.verdict() {
                    log::info!("round {} finished: {:?}", self.engine.round_id().get(), verdict);
                }
                outcome.has_update()
            }
            RevealElapsed(round) => self.engine.finish_reveal(round),
            Restart => {
                log::debug!("restart");
                self.engine.restart();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let size = self.engine.config().size();
        let board = self.board();
        let locked = !board.input_enabled;

        html! {
            <div class="recall">
                {self.view_message(ctx, game::Verdict::Won, "You win!", "Do it again!")}
                {self.view_message(ctx, game::Verdict::Lost, "Whomp... Sorry", "Try again...")}
                <div class={classes!("recall-grid", (!locked).then_some("playable"))}>
                    {
                        for (0..size).map(|row| html! {
                            <div class="recall-grid-row">
                                {
                                    for (0..size).map(|col| {
                                        let selected = board.is_shown((row, col));
                                        let callback = ctx.link().callback(Msg::Select);
                                        html! {
                                            <TileView {row} {col} {selected} {locked} {callback}/>
                                        }
                                    })
                                }
                            </div>
                        })
                    }
                </div>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::RoundObserver;

    fn fixture() -> game::Pattern {
        game::Pattern::from_coords(3, &[(0, 0), (1, 1)]).unwrap()
    }

    #[test]
    fn board_shows_target_then_empty_selection() {
        let mut board = BoardModel::new(3);

        board.on_reveal(&fixture());
        assert!(board.is_shown((0, 0)));
        assert!(!board.input_enabled);

        board.on_hide_reveal(&game::Pattern::empty(3));
        assert!(!board.is_shown((0, 0)));
        assert!(board.input_enabled);
    }

    #[test]
    fn verdict_locks_input_until_restart_clears_message() {
        let mut board = BoardModel::new(3);
        board.on_hide_reveal(&game::Pattern::empty(3));

        board.on_lose();
        assert!(!board.input_enabled);
        assert!(!board.is_message_hidden(game::Verdict::Lost));
        assert!(board.is_message_hidden(game::Verdict::Won));

        board.on_restart();
        assert!(board.is_message_hidden(game::Verdict::Lost));
    }

    #[test]
    fn board_follows_engine_round() {
        let config = game::RoundConfig::with_reveal_delay(3, 2, 10).unwrap();
        let mut engine =
            game::RecallEngine::new(config, 1, game::ManualScheduler::new(), BoardModel::new(3));

        engine.start_with(fixture()).unwrap();
        assert_eq!(engine.observer().shown, fixture());

        engine.advance(10);
        engine.select((0, 0));
        engine.select((1, 1));

        assert_eq!(engine.observer().shown, fixture());
        assert_eq!(engine.observer().message, Some(game::Verdict::Won));
        assert!(!engine.observer().input_enabled);
    }
}
