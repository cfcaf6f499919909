//! Meal Planner entry point
//!
//! Mounts the grid in the browser, or prints the stored week natively.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement, KeyboardEvent};

    use meal_planner::persistence::LocalStorageStore;
    use meal_planner::{Day, GridAction, MealSlot, PlanGridController, PlannerConfig, logging};

    type Planner = Rc<RefCell<PlanGridController<LocalStorageStore>>>;

    const EDITOR_ID: &str = "meal-editor";

    pub fn run() -> Result<(), JsValue> {
        let config = PlannerConfig::default();
        logging::init(config.log_level);
        log::info!("Meal Planner (web) starting...");

        let planner: Planner = Rc::new(RefCell::new(PlanGridController::new(
            config.storage_key,
            LocalStorageStore::new(),
        )));

        let document = document()?;
        let root = mount_point(&document)?;
        install_listeners(&root, &planner)?;

        // First render happens before storage is read and draws nothing
        render(&planner)?;

        let deferred = planner.clone();
        wasm_bindgen_futures::spawn_local(async move {
            deferred.borrow_mut().load();
            rerender(&deferred);
        });

        Ok(())
    }

    fn document() -> Result<Document, JsValue> {
        web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("document not available"))
    }

    fn mount_point(document: &Document) -> Result<Element, JsValue> {
        if let Some(el) = document.get_element_by_id("app") {
            return Ok(el);
        }
        let el = document.create_element("div")?;
        el.set_id("app");
        document
            .body()
            .ok_or_else(|| JsValue::from_str("body not available"))?
            .append_child(&el)?;
        Ok(el)
    }

    /// Delegated click/keydown/input listeners on the mount point
    ///
    /// Installed once; redraws only replace the root's children, which carry
    /// `data-action`/`data-day`/`data-meal` tags instead of their own handlers.
    fn install_listeners(root: &Element, planner: &Planner) -> Result<(), JsValue> {
        {
            let planner = planner.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                let Some(action) = event_target(&event)
                    .and_then(|el| el.closest("[data-action]").ok().flatten())
                    .and_then(|el| {
                        GridAction::parse(
                            &el.get_attribute("data-action")?,
                            el.get_attribute("data-day").as_deref(),
                            el.get_attribute("data-meal").as_deref(),
                        )
                    })
                else {
                    return;
                };
                planner.borrow_mut().apply(action, confirm);
                rerender(&planner);
            });
            root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let planner = planner.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if !event_target(&event).is_some_and(|el| el.id() == EDITOR_ID) {
                    return;
                }
                let Some(action) = GridAction::from_key(&event.key()) else {
                    return;
                };
                planner.borrow_mut().apply(action, confirm);
                rerender(&planner);
            });
            root.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let planner = planner.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .filter(|input| input.id() == EDITOR_ID)
                else {
                    return;
                };
                planner.borrow_mut().set_draft(input.value());
            });
            root.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn event_target(event: &web_sys::Event) -> Option<Element> {
        event.target()?.dyn_into::<Element>().ok()
    }

    fn element(document: &Document, tag: &str, class: &str, text: Option<&str>) -> Result<Element, JsValue> {
        let el = document.create_element(tag)?;
        el.set_class_name(class);
        if text.is_some() {
            el.set_text_content(text);
        }
        Ok(el)
    }

    /// Tag an element with the action a click on it performs
    fn tag_action(el: &Element, action: GridAction) -> Result<(), JsValue> {
        el.set_attribute("data-action", action.name())?;
        if let Some((day, meal)) = action.cell() {
            el.set_attribute("data-day", day.as_str())?;
            el.set_attribute("data-meal", meal.as_str())?;
        }
        Ok(())
    }

    fn button(document: &Document, class: &str, label: &str, action: GridAction) -> Result<Element, JsValue> {
        let btn = element(document, "button", class, Some(label))?;
        btn.set_attribute("title", label)?;
        tag_action(&btn, action)?;
        Ok(btn)
    }

    /// Redraw the whole grid from controller state
    fn render(planner: &Planner) -> Result<(), JsValue> {
        let document = document()?;
        let root = mount_point(&document)?;
        root.set_inner_html("");

        let controller = planner.borrow();
        if !controller.is_loaded() {
            return Ok(());
        }

        root.append_child(&render_header(&document, &controller)?)?;

        let grid = element(&document, "main", "grid", None)?;
        for day in Day::ALL {
            let card = element(&document, "section", "day-card", None)?;
            card.append_child(&element(&document, "h2", "day-title", Some(day.as_str()))?)?;
            for meal in MealSlot::ALL {
                card.append_child(&render_cell(&document, &controller, day, meal)?)?;
            }
            grid.append_child(&card)?;
        }
        root.append_child(&grid)?;

        // Autofocus the open editor
        if let Some(input) = document.get_element_by_id(EDITOR_ID) {
            if let Ok(input) = input.dyn_into::<HtmlInputElement>() {
                let _ = input.focus();
            }
        }

        Ok(())
    }

    fn render_header(
        document: &Document,
        controller: &PlanGridController<LocalStorageStore>,
    ) -> Result<Element, JsValue> {
        let stats = controller.stats();
        let header = element(document, "header", "header", None)?;
        header.append_child(&element(document, "h1", "title", Some("Weekly Meal Planner"))?)?;

        for (value, label, class) in [
            (stats.planned, "Planned", "stat stat-planned"),
            (stats.empty, "Empty", "stat stat-empty"),
        ] {
            let stat = element(document, "div", class, None)?;
            stat.append_child(&element(document, "span", "stat-value", Some(&value.to_string()))?)?;
            stat.append_child(&element(document, "span", "stat-label", Some(label))?)?;
            header.append_child(&stat)?;
        }
        Ok(header)
    }

    fn render_cell(
        document: &Document,
        controller: &PlanGridController<LocalStorageStore>,
        day: Day,
        meal: MealSlot,
    ) -> Result<Element, JsValue> {
        let view = controller.cell_view(day, meal);
        let row = element(document, "div", "meal", None)?;
        row.append_child(&element(document, "div", "meal-label", Some(meal.as_str()))?)?;

        if view.is_editing {
            let input = document
                .create_element("input")?
                .dyn_into::<HtmlInputElement>()?;
            input.set_id(EDITOR_ID);
            input.set_class_name("meal-input");
            input.set_value(controller.session().draft().unwrap_or_default());
            input.set_placeholder(&format!("What for {}?", meal.as_str()));

            row.append_child(&input)?;
            row.append_child(&button(document, "btn btn-save", "Save", GridAction::Save)?)?;
            row.append_child(&button(document, "btn btn-cancel", "Cancel", GridAction::Cancel)?)?;
            return Ok(row);
        }

        let edit = GridAction::Edit { day, meal };
        let (text, class) = if view.has_meal {
            (view.text.as_str(), "meal-text")
        } else {
            ("Plan a meal...", "meal-text meal-placeholder")
        };
        let text_el = element(document, "div", class, Some(text))?;
        tag_action(&text_el, edit)?;
        row.append_child(&text_el)?;

        let edit_label = if view.has_meal { "Edit" } else { "Add" };
        row.append_child(&button(document, "btn btn-edit", edit_label, edit)?)?;

        if view.has_meal {
            let clear = GridAction::Clear { day, meal };
            row.append_child(&button(document, "btn btn-clear", "Clear", clear)?)?;
        }

        Ok(row)
    }

    fn rerender(planner: &Planner) {
        if let Err(e) = render(planner) {
            log::error!("Render failed: {:?}", e);
        }
    }

    fn confirm(prompt: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(prompt).ok())
            .unwrap_or(false)
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use meal_planner::persistence::FileStore;
    use meal_planner::{Day, MealSlot, PlanGridController, PlannerConfig, logging};

    let config = PlannerConfig::default();
    logging::init(config.log_level);
    log::info!("Meal Planner (native) starting...");
    log::info!("The interactive grid is web only - run with `trunk serve`");

    let path = config.data_file_path();
    log::info!("Using store at {}", path.display());

    let mut planner = PlanGridController::new(config.storage_key, FileStore::new(path));
    planner.load();

    let stats = planner.stats();
    println!("Weekly Meal Planner");
    println!("Planned: {}  Empty: {}\n", stats.planned, stats.empty);
    for day in Day::ALL {
        println!("{}", day.as_str());
        for meal in MealSlot::ALL {
            let view = planner.cell_view(day, meal);
            let text = if view.has_meal { view.text.as_str() } else { "-" };
            println!("  {:<10} {}", meal.as_str(), text);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
