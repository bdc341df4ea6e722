use components::{
    map_view::LeafletView,
    workout_form::WorkoutFormComponent,
    workout_list::WorkoutListComponent,
};
use gloo_console::{error, info};
use gloo_utils::window;
use storage::LocalStorageBackend;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::GeolocationPosition;
use workout_tracker_data_management::{TrackerError, WorkoutTracker, WorkoutView};
use workout_tracker_lib::{Position, WorkoutId, WorkoutInput};
use yew::prelude::*;

mod components;
mod storage;

enum Msg {
    PositionFound(Position),
    PositionUnavailable,
    MapClicked(Position),
    Submit(WorkoutInput),
    SelectWorkout(WorkoutId),
    Reset,
}

struct Model {
    tracker: Option<WorkoutTracker<LeafletView, LocalStorageBackend>>,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let view = match LeafletView::new() {
            Ok(view) => view,
            Err(err) => {
                error!(format!("Failed to create map: {err:?}"));
                return Self { tracker: None };
            }
        };
        view.on_click(ctx.link().callback(Msg::MapClicked));

        let mut tracker = WorkoutTracker::new(view, LocalStorageBackend);
        if let Err(err) = tracker.restore() {
            // Keep going with an empty list, the stored blob stays until the next save
            error!(format!("Failed to restore workouts: {err}"));
            tracker.view_mut().alert(&err.to_string());
        }

        Self {
            tracker: Some(tracker),
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            request_position(ctx.link().callback(|msg: Msg| msg));
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        let Some(tracker) = self.tracker.as_mut() else {
            return false;
        };

        match msg {
            Msg::PositionFound(position) => {
                info!(format!("Position: {:?}", position));
                tracker.on_position_found(position);
            }
            Msg::PositionUnavailable => {
                let err = tracker.on_position_unavailable();
                error!(format!("{err}"));
            }
            Msg::MapClicked(position) => {
                tracker.on_map_click(position);
            }
            Msg::Submit(input) => match tracker.submit(input) {
                Ok(workout) => info!(format!("Added workout {}", workout.id)),
                Err(TrackerError::InvalidInput(err)) => info!(format!("Rejected input: {err}")),
                Err(err) => error!(format!("Failed to add workout: {err}")),
            },
            Msg::SelectWorkout(id) => {
                if let Err(err) = tracker.move_to_workout(&id) {
                    error!(format!("{err}"));
                }
                return false;
            }
            Msg::Reset => {
                if let Err(err) = tracker.reset() {
                    error!(format!("Failed to delete workouts: {err}"));
                    tracker.view_mut().alert(&err.to_string());
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(tracker) = &self.tracker else {
            return html! { <h1>{"The map could not be created"}</h1> };
        };

        let link = ctx.link();
        html! {
            <>
                <div class="sidebar">
                    <WorkoutFormComponent
                        visible={tracker.is_form_visible()}
                        on_submit={link.callback(Msg::Submit)}
                    />
                    <WorkoutListComponent
                        workouts={tracker.workouts().to_vec()}
                        on_select={link.callback(Msg::SelectWorkout)}
                        on_reset={link.callback(|()| Msg::Reset)}
                    />
                </div>
                {tracker.view().render_map()}
            </>
        }
    }
}

/// Asks the browser for the current position once.
fn request_position(callback: Callback<Msg>) {
    let geolocation = match window().navigator().geolocation() {
        Ok(geolocation) => geolocation,
        Err(err) => {
            error!(format!("Geolocation unavailable: {err:?}"));
            callback.emit(Msg::PositionUnavailable);
            return;
        }
    };

    let on_success = {
        let callback = callback.clone();
        Closure::<dyn Fn(GeolocationPosition)>::new(move |position: GeolocationPosition| {
            let coords = position.coords();
            callback.emit(Msg::PositionFound(Position::new(coords.latitude(), coords.longitude())));
        })
    };

    let on_error = {
        let callback = callback.clone();
        Closure::<dyn Fn(JsValue)>::new(move |_: JsValue| callback.emit(Msg::PositionUnavailable))
    };

    if let Err(err) = geolocation.get_current_position_with_error_callback(
        on_success.as_ref().unchecked_ref(),
        Some(on_error.as_ref().unchecked_ref()),
    ) {
        error!(format!("Failed to request position: {err:?}"));
        callback.emit(Msg::PositionUnavailable);
        return;
    }

    // Called back at most once, after this function has returned
    on_success.forget();
    on_error.forget();
}

fn main() {
    yew::Renderer::<Model>::new().render();
}
