/// Course preview root: strand selection plus the filtered outline

use crate::config::StrandingConfig;
use crate::course::{CourseStructure, Topic, preview_pages};
use crate::selection::{commit, initial_selection};
use crate::store::StrandStore;
use crate::ui::components::{CourseOutline, StrandSelector};
use crate::visibility::filter_topics;
use patternfly_yew::prelude::{Alert, AlertType};
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PreviewProps {
    pub course: Rc<CourseStructure>,
    pub config: Rc<StrandingConfig>,
}

/// "3 of 5 pages visible"
pub fn visible_summary(visible: &[Topic], total_pages: usize) -> String {
    let shown = preview_pages(visible).len();
    let noun = if total_pages == 1 { "page" } else { "pages" };
    format!("{} of {} {} visible", shown, total_pages, noun)
}

#[function_component(PreviewApp)]
pub fn preview_app(props: &PreviewProps) -> Html {
    let selection = {
        let config = props.config.clone();
        use_state(move || initial_selection(&StrandStore::local(&config.storage_key), &config))
    };
    let save_failed = use_state(|| false);

    let visible = use_memo(
        ((*selection).clone(), props.course.clone()),
        |(active, course)| filter_topics(&course.topics, active),
    );

    // Selection changes apply to UI state first; a failed write only warns.
    let on_strands_change = {
        let selection = selection.clone();
        let save_failed = save_failed.clone();
        let config = props.config.clone();

        Callback::from(move |next: Vec<String>| {
            selection.set(next.clone());
            let store = StrandStore::local(&config.storage_key);
            save_failed.set(!commit(&store, &config, &next));
        })
    };

    html! {
        <div class="padding-20">
            <h1 class="preview-title">{"Course Preview"}</h1>

            if *save_failed {
                <Alert r#type={AlertType::Warning} title={"Strand selection could not be saved"} inline={true}>
                </Alert>
            }

            <StrandSelector
                vocabulary={props.config.vocabulary.clone()}
                selected={(*selection).clone()}
                onchange={on_strands_change}
            />

            <p class="outline-summary">
                {visible_summary(&visible, props.course.page_count())}
            </p>

            <CourseOutline topics={visible.clone()} />
        </div>
    }
}
