use workout_tracker_lib::{Workout, WorkoutId};
use yew::prelude::*;

#[derive(PartialEq, Properties, Clone)]
pub struct WorkoutListProps {
    pub workouts: Vec<Workout>,
    pub on_select: Callback<WorkoutId>,
    pub on_reset: Callback<()>,
}

/// Newest workout first, like entries inserted right below the form.
#[function_component]
pub fn WorkoutListComponent(props: &WorkoutListProps) -> Html {
    let on_reset = {
        let on_reset = props.on_reset.clone();
        Callback::from(move |_| on_reset.emit(()))
    };

    html! {
        <>
            <ul class="workouts">
                { for props.workouts.iter().rev().map(|workout| workout_item(workout, &props.on_select)) }
            </ul>
            if !props.workouts.is_empty() {
                <button class="reset-btn" onclick={on_reset}>{"Delete all workouts"}</button>
            }
        </>
    }
}

fn workout_item(workout: &Workout, on_select: &Callback<WorkoutId>) -> Html {
    let workout_type = workout.workout_type();
    let (metric, metric_unit) = workout.metric_summary();
    let (extra, extra_unit) = workout.variant_summary();
    let extra_icon = if extra_unit == "spm" { "🦶🏼" } else { "⛰" };

    let onclick = {
        let id = workout.id.clone();
        let on_select = on_select.clone();
        Callback::from(move |_| on_select.emit(id.clone()))
    };

    html! {
        <li key={workout.id.to_string()} class={classes!("workout", format!("workout--{}", workout_type))} data-id={workout.id.to_string()} {onclick}>
            <h2 class="workout__title">{workout.description.clone()}</h2>
            {detail(workout_type.icon(), workout.distance_km.to_string(), "km")}
            {detail("⏱", workout.duration_min.to_string(), "min")}
            {detail("⚡️", metric, metric_unit)}
            {detail(extra_icon, extra, extra_unit)}
        </li>
    }
}

fn detail(icon: &'static str, value: String, unit: &'static str) -> Html {
    html! {
        <div class="workout__details">
            <span class="workout__icon">{icon}</span>
            <span class="workout__value">{value}</span>
            <span class="workout__unit">{unit}</span>
        </div>
    }
}
