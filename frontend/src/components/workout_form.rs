use web_sys::{HtmlInputElement, HtmlSelectElement};
use workout_tracker_lib::{WorkoutInput, WorkoutType};
use yew::prelude::*;

#[derive(PartialEq, Properties, Clone)]
pub struct WorkoutFormProps {
    pub visible: bool,
    pub on_submit: Callback<WorkoutInput>,
}

#[function_component]
pub fn WorkoutFormComponent(props: &WorkoutFormProps) -> Html {
    let workout_type = use_state(|| WorkoutType::Running);
    let distance = use_state(String::new);
    let duration = use_state(String::new);
    let cadence = use_state(String::new);
    let elevation = use_state(String::new);

    // Clear the inputs whenever the form is hidden
    {
        let fields = [distance.clone(), duration.clone(), cadence.clone(), elevation.clone()];
        use_effect_with(props.visible, move |visible| {
            if !*visible {
                for field in fields {
                    field.set(String::new());
                }
            }
        });
    }

    let on_type_change = {
        let workout_type = workout_type.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(selected) = select.value().parse::<WorkoutType>() {
                workout_type.set(selected);
            }
        })
    };

    let on_submit = {
        let workout_type = workout_type.clone();
        let distance = distance.clone();
        let duration = duration.clone();
        let cadence = cadence.clone();
        let elevation = elevation.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(WorkoutInput {
                workout_type: *workout_type,
                distance_km: WorkoutInput::parse_field(&distance),
                duration_min: WorkoutInput::parse_field(&duration),
                cadence_spm: WorkoutInput::parse_field(&cadence),
                elevation_gain_m: WorkoutInput::parse_field(&elevation),
            });
        })
    };

    let running = *workout_type == WorkoutType::Running;

    html! {
        <form class={classes!("form", (!props.visible).then_some("hidden"))} onsubmit={on_submit}>
            <div class="form__row">
                <label class="form__label">{"Type"}</label>
                <select class="form__input form__input--type" onchange={on_type_change}>
                    <option value="running" selected={running}>{"Running"}</option>
                    <option value="cycling" selected={!running}>{"Cycling"}</option>
                </select>
            </div>
            <FormInput label="Distance" placeholder="km" class="form__input--distance" value={distance} />
            <FormInput label="Duration" placeholder="min" class="form__input--duration" value={duration} />
            <FormInput label="Cadence" placeholder="step/min" class="form__input--cadence" value={cadence} hidden={!running} />
            <FormInput label="Elev Gain" placeholder="meters" class="form__input--elevation" value={elevation} hidden={running} />
            <button class="form__btn">{"OK"}</button>
        </form>
    }
}

#[derive(PartialEq, Properties, Clone)]
struct FormInputProps {
    label: AttrValue,
    placeholder: AttrValue,
    class: AttrValue,
    value: UseStateHandle<String>,
    #[prop_or_default]
    hidden: bool,
}

#[function_component]
fn FormInput(props: &FormInputProps) -> Html {
    let oninput = {
        let value = props.value.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            value.set(input.value());
        })
    };

    html! {
        <div class={classes!("form__row", props.hidden.then_some("form__row--hidden"))}>
            <label class="form__label">{props.label.clone()}</label>
            <input
                class={classes!("form__input", props.class.to_string())}
                placeholder={props.placeholder.clone()}
                value={(*props.value).clone()}
                {oninput}
            />
        </div>
    }
}
