use gloo_console::error;
use gloo_utils::{document, window};
use leaflet::{LatLng, Map, MapOptions, Marker, MouseEvent, Popup, PopupOptions, TileLayer, TileLayerOptions};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{HtmlElement, Node};
use workout_tracker_data_management::WorkoutView;
use workout_tracker_lib::{Position, Workout};
use yew::prelude::*;

/// Leaflet map living in its own detached container, mounted into the page by `render_map`.
pub struct LeafletView {
    map: Map,
    container: HtmlElement,
    markers: Vec<Marker>,
}

impl LeafletView {
    pub fn new() -> Result<Self, JsValue> {
        let container = document().create_element("div")?.dyn_into::<HtmlElement>()?;
        container.set_class_name("map");

        let map = Map::new_with_element(&container, &MapOptions::default());

        Ok(Self {
            map,
            container,
            markers: Vec::new(),
        })
    }

    pub fn render_map(&self) -> Html {
        let node: &Node = &self.container.clone().into();
        Html::VRef(node.clone())
    }

    /// Emits the clicked coordinate for every click on the map.
    pub fn on_click(&self, callback: Callback<Position>) {
        let handler = Closure::<dyn Fn(MouseEvent)>::new(move |event: MouseEvent| {
            let lat_lng = event.lat_lng();
            callback.emit(Position::new(lat_lng.lat(), lat_lng.lng()));
        });
        self.map.on("click", handler.as_ref());
        // The map holds on to the handler for the lifetime of the page
        handler.forget();
    }
}

impl WorkoutView for LeafletView {
    fn show_map(&mut self, center: Position, zoom: f64) {
        // The container was sized while detached, measure it again now that it is mounted
        self.map.invalidate_size(false);
        self.map.set_view(&LatLng::new(center.latitude(), center.longitude()), zoom);
        add_tile_layer(&self.map);
    }

    fn set_view(&mut self, center: Position, zoom: f64) {
        self.map.set_view(&LatLng::new(center.latitude(), center.longitude()), zoom);
    }

    fn render_marker(&mut self, workout: &Workout) {
        let workout_type = workout.workout_type();

        let popup_opts = PopupOptions::default();
        popup_opts.set_max_width(250.);
        popup_opts.set_min_width(100.);
        popup_opts.set_auto_close(false);
        popup_opts.set_close_on_click(false);
        popup_opts.set_class_name(workout_type.popup_class());
        let popup = Popup::new(&popup_opts, None);
        popup.set_content(&workout.popup_text().into());

        let marker = Marker::new(&LatLng::new(workout.position.latitude(), workout.position.longitude()));
        marker.add_to(&self.map);
        marker.bind_popup(&popup);
        marker.open_popup();
        self.markers.push(marker);
    }

    // The list and the form are rendered by yew from the tracker state
    fn render_workout(&mut self, _workout: &Workout) {}

    fn clear_workouts(&mut self) {
        for marker in self.markers.drain(..) {
            marker.remove();
        }
    }

    fn show_form(&mut self) {}

    fn hide_form(&mut self) {}

    fn alert(&mut self, message: &str) {
        if let Err(err) = window().alert_with_message(message) {
            error!(format!("Failed to show alert: {err:?}"));
        }
    }

    fn reload(&mut self) {
        self.clear_workouts();

        if let Err(err) = window().location().reload() {
            error!(format!("Failed to reload page: {err:?}"));
        }
    }
}

fn add_tile_layer(map: &Map) {
    let url = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
    let opts = TileLayerOptions::new();
    opts.set_update_when_idle(true);
    TileLayer::new_options(url, &opts).add_to(map);
}
