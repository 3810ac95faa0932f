/// Reusable UI components

use crate::course::{Page, Topic};
use crate::selection::toggle;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StrandSelectorProps {
    pub vocabulary: Vec<String>,
    pub selected: Vec<String>,
    /// Receives the complete new selection after a checkbox changes
    pub onchange: Callback<Vec<String>>,
}

#[function_component(StrandSelector)]
pub fn strand_selector(props: &StrandSelectorProps) -> Html {
    html! {
        <fieldset class="strand-selector">
            <legend class="strand-selector-title">{"Strands"}</legend>
            {for props.vocabulary.iter().map(|label| {
                let checked = props.selected.contains(label);
                let onchange = {
                    let label = label.clone();
                    let selected = props.selected.clone();
                    let vocabulary = props.vocabulary.clone();
                    let onchange = props.onchange.clone();

                    Callback::from(move |e: Event| {
                        if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                            onchange.emit(toggle(&selected, &label, input.checked(), &vocabulary));
                        }
                    })
                };

                html! {
                    <label class="strand-option" key={label.clone()}>
                        <input type="checkbox" {checked} {onchange} />
                        <span class="strand-option-label">{label.clone()}</span>
                    </label>
                }
            })}
        </fieldset>
    }
}

#[derive(Properties, PartialEq)]
pub struct CourseOutlineProps {
    pub topics: Rc<Vec<Topic>>,
}

/// Menu text for a page, falling back to its label and then its file name.
pub fn page_title(page: &Page) -> &str {
    [&page.menu_label, &page.label, &page.file]
        .into_iter()
        .find(|text| !text.is_empty())
        .map(String::as_str)
        .unwrap_or("")
}

#[function_component(CourseOutline)]
pub fn course_outline(props: &CourseOutlineProps) -> Html {
    html! {
        <div class="outline-container">
            if props.topics.is_empty() {
                <p class="outline-empty">{"No pages are visible for the selected strands."}</p>
            } else {
                <ol class="course-outline">
                    {for props.topics.iter().map(|topic| html! {
                        <li class="outline-topic" key={topic.id.clone()}>
                            <h2 class="outline-topic-name">{topic.name.clone()}</h2>
                            <ol class="outline-pages">
                                {for topic.pages.iter().map(|page| html! {
                                    <li class="outline-page">
                                        <span class="outline-chapter">{page.chapter_readable.clone()}</span>
                                        <span class="outline-title">{page_title(page).to_string()}</span>
                                    </li>
                                })}
                            </ol>
                        </li>
                    })}
                </ol>
            }
        </div>
    }
}
