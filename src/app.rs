use hand_coach_lib::cards::cards_to_display;
use hand_coach_lib::coach::FactSheet;
use hand_coach_lib::stats::{leaks, summarize, HandFilter, PrimaryFilter};
use hand_coach_lib::timeline::{self, Timeline};
use hand_coach_lib::{decode_log, demo, parse_hands_with, Config, Error, HandLog, IndexedHand};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Event, FileReader, HtmlInputElement};

const FILTER_OPTIONS: [(&str, &str); 5] = [
    ("all", "All hands"),
    ("vpip", "VPIP"),
    ("won", "Won"),
    ("lost", "Lost"),
    ("big-pot", "Big pot"),
];

fn status_class(status: &str) -> &'static str {
    if status.starts_with("[ERR]") {
        "mt-4 p-4 rounded-lg bg-red-50 dark:bg-red-900/20 text-red-700 dark:text-red-400"
    } else if status.starts_with("[OK]") {
        "mt-4 p-4 rounded-lg bg-green-50 dark:bg-green-900/20 text-green-700 dark:text-green-400"
    } else {
        "mt-4 p-4 rounded-lg bg-blue-50 dark:bg-blue-900/20 text-blue-700 dark:text-blue-400"
    }
}

fn download(content: &str, file_name: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object available")?;
    let document = window.document().ok_or("No document available")?;

    let array = js_sys::Array::new();
    array.push(&JsValue::from_str(content));
    let blob = web_sys::Blob::new_with_str_sequence(&array)
        .map_err(|_| "Failed to create blob".to_string())?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|_| "Failed to create download URL".to_string())?;

    let a = document
        .create_element("a")
        .map_err(|_| "Failed to create link element".to_string())?;
    a.set_attribute("href", &url)
        .map_err(|_| "Failed to set href".to_string())?;
    a.set_attribute("download", file_name)
        .map_err(|_| "Failed to set download attribute".to_string())?;
    a.dyn_into::<web_sys::HtmlElement>()
        .map_err(|_| "Failed to convert to HtmlElement".to_string())?
        .click();

    web_sys::Url::revoke_object_url(&url).map_err(|_| "Failed to revoke URL".to_string())
}

#[component]
pub fn App() -> impl IntoView {
    let config = Config::default();
    let report = &config.report;

    let (is_dragging, set_is_dragging) = signal(false);
    let (status, set_status) = signal::<Option<String>>(None);
    let (hero, set_hero) = signal::<Option<String>>(None);
    let (hands, set_hands) = signal(Vec::<IndexedHand>::new());
    let (primary, set_primary) = signal(PrimaryFilter::All);
    let (selected, set_selected) = signal::<Option<usize>>(None);

    let load_log = move |log: HandLog, source: String| {
        if log.is_empty() {
            set_status.set(Some(format!("[ERR] {}", Error::NoHands)));
            return;
        }
        let hands = log.hands.len();
        set_hero.set(log.hero.clone());
        set_hands.set(log.into_chronological());
        set_selected.set(None);
        set_status.set(Some(format!("[OK] Parsed {} hands from {}", hands, source)));
    };

    let parser = StoredValue::new(config.parser.clone());
    let handle_files = move |files: web_sys::FileList| {
        let Some(file) = files.item(0) else {
            return;
        };
        let file_name = file.name();
        if !file_name.ends_with(".txt") {
            set_status.set(Some("[ERR] Please upload a .txt hand history".to_string()));
            return;
        }
        set_status.set(Some(format!("Reading {}...", file_name)));

        match FileReader::new() {
            Ok(file_reader) => {
                let fr = file_reader.clone();
                let parser = parser.get_value();
                let onload = Closure::wrap(Box::new(move |_: Event| {
                    match fr.result().ok().filter(|r| r.is_instance_of::<js_sys::ArrayBuffer>()) {
                        Some(buffer) => {
                            let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
                            let content = decode_log(&bytes);
                            load_log(parse_hands_with(&content, &parser), file_name.clone());
                        }
                        None => {
                            set_status.set(Some("[ERR] Could not read file content".to_string()));
                        }
                    }
                }) as Box<dyn FnMut(_)>);

                file_reader.set_onload(Some(onload.as_ref().unchecked_ref()));
                onload.forget();

                if file_reader.read_as_array_buffer(&file).is_err() {
                    set_status.set(Some("[ERR] Failed to read file".to_string()));
                }
            }
            Err(_) => {
                set_status.set(Some("[ERR] Failed to initialize file reader".to_string()));
            }
        }
    };

    let on_file_input = move |ev: Event| {
        if let Some(input) = ev.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) {
            if let Some(files) = input.files() {
                handle_files(files);
            }
        }
    };

    let on_drag_over = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragging.set(true);
    };

    let on_drag_leave = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragging.set(false);
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
            handle_files(files);
        }
        set_is_dragging.set(false);
    };

    let demo_parser = config.parser.clone();
    let load_demo = move |_| {
        load_log(demo::demo_hands(&demo_parser), "the demo log".to_string());
    };

    let export_json = move |_| {
        let result = hands.with_untracked(|hs| serde_json::to_string_pretty(hs));
        match result {
            Ok(json) => {
                if let Err(e) = download(&json, "hands.json") {
                    set_status.set(Some(format!("[ERR] Download failed: {}", e)));
                }
            }
            Err(e) => set_status.set(Some(format!("[ERR] Could not serialize hands: {}", e))),
        }
    };

    let copy_fact_sheet = move |_| {
        let Some(idx) = selected.get_untracked() else {
            return;
        };
        let Some(facts) = hands.with_untracked(|hs| {
            hs.iter()
                .find(|h| h.display_index == idx)
                .map(|h| FactSheet::from_hand(h).to_string())
        }) else {
            return;
        };

        spawn_local(async move {
            match web_sys::window() {
                Some(window) => {
                    let promise = window.navigator().clipboard().write_text(&facts);
                    match wasm_bindgen_futures::JsFuture::from(promise).await {
                        Ok(_) => set_status.set(Some("Fact sheet copied to clipboard".to_string())),
                        Err(_) => {
                            set_status.set(Some("[ERR] Failed to write to clipboard".to_string()))
                        }
                    }
                }
                None => set_status.set(Some("[ERR] Window object not available".to_string())),
            }
        });
    };

    let big_pot_bb = report.big_pot_bb;
    let filtered = move || {
        let filter = HandFilter {
            primary: primary.get(),
            card_types: Vec::new(),
            positions: Vec::new(),
            big_pot_bb,
        };
        hands.with(|hs| filter.apply(hs).into_iter().cloned().collect::<Vec<_>>())
    };

    let selected_timeline = move || -> Option<Timeline> {
        let idx = selected.get()?;
        hands.with(|hs| {
            let hand = hs.iter().find(|h| h.display_index == idx)?;
            timeline::render(&hand.raw_text, &hand.hero_name, hand.big_blind_size)
        })
    };

    let leak_count = report.leak_count;

    view! {
        <div class="min-h-screen bg-gray-50 dark:bg-gray-900 py-12 px-4 sm:px-6 lg:px-8">
            <div class="max-w-5xl mx-auto">
                <div class="text-center mb-12">
                    <h1 class="text-4xl md:text-5xl font-bold text-gray-900 dark:text-white mb-4">
                        "Hand Coach"
                    </h1>
                    <p class="text-xl text-gray-600 dark:text-gray-300">
                        "Review GGPoker tournament hands by position, pot size and result"
                    </p>
                </div>

                <div class="bg-white dark:bg-gray-800 rounded-lg shadow-lg p-8 mb-8">
                    <div
                        class=move || {
                            if is_dragging.get() {
                                "border-2 border-dashed rounded-lg p-12 text-center border-blue-500 bg-blue-50 dark:bg-blue-900/20"
                            } else {
                                "border-2 border-dashed rounded-lg p-12 text-center border-gray-300 dark:border-gray-600 hover:border-blue-400"
                            }
                        }
                        on:dragover=on_drag_over
                        on:dragleave=on_drag_leave
                        on:drop=on_drop
                    >
                        <p class="text-lg text-gray-700 dark:text-gray-300 mb-4">
                            "Drop a hand history export here"
                        </p>
                        <div class="flex justify-center gap-3">
                            <label class="inline-block bg-blue-600 hover:bg-blue-700 text-white font-semibold py-2 px-6 rounded-lg cursor-pointer transition-colors">
                                "Browse Files"
                                <input type="file" accept=".txt" class="sr-only" on:change=on_file_input />
                            </label>
                            <button
                                class="bg-gray-200 dark:bg-gray-700 hover:bg-gray-300 text-gray-900 dark:text-white font-semibold py-2 px-6 rounded-lg transition-colors"
                                on:click=load_demo
                            >
                                "Load Demo"
                            </button>
                        </div>
                    </div>

                    {move || status.get().map(|status| {
                        view! { <div class=status_class(&status)>{status.clone()}</div> }
                    })}
                </div>

                {move || (!hands.with(Vec::is_empty)).then(|| {
                    let summary = hands.with(|hs| summarize(hs));
                    view! {
                        <div class="grid grid-cols-2 md:grid-cols-4 gap-4 mb-8">
                            <div class="bg-white dark:bg-gray-800 rounded-lg shadow p-4">
                                <p class="text-sm text-gray-500">"Hands"</p>
                                <p class="text-2xl font-bold">{summary.total_hands}</p>
                            </div>
                            <div class="bg-white dark:bg-gray-800 rounded-lg shadow p-4">
                                <p class="text-sm text-gray-500">"VPIP"</p>
                                <p class="text-2xl font-bold">{format!("{:.1}%", summary.vpip_pct)}</p>
                            </div>
                            <div class="bg-white dark:bg-gray-800 rounded-lg shadow p-4">
                                <p class="text-sm text-gray-500">"PFR"</p>
                                <p class="text-2xl font-bold">{format!("{:.1}%", summary.pfr_pct)}</p>
                            </div>
                            <div class="bg-white dark:bg-gray-800 rounded-lg shadow p-4">
                                <p class="text-sm text-gray-500">"Hero"</p>
                                <p class="text-2xl font-bold">{hero.get().unwrap_or_default()}</p>
                            </div>
                        </div>
                        <div class="bg-white dark:bg-gray-800 rounded-lg shadow-lg p-6 mb-8">
                            <h2 class="text-xl font-bold mb-3">"By position"</h2>
                            <ul class="grid grid-cols-2 md:grid-cols-3 gap-2 text-sm">
                                {summary.by_position.into_iter().map(|b| view! {
                                    <li>
                                        <span class="font-semibold">{b.bucket.label()}</span>
                                        ": "
                                        {b.to_string()}
                                    </li>
                                }).collect_view()}
                            </ul>
                        </div>
                    }
                })}

                {move || (!hands.with(Vec::is_empty)).then(|| view! {
                    <div class="bg-white dark:bg-gray-800 rounded-lg shadow-lg p-6 mb-8">
                        <h2 class="text-xl font-bold mb-3">"Biggest leaks"</h2>
                        <ul class="space-y-2">
                            {hands.with(|hs| {
                                leaks(hs, leak_count).into_iter().map(|h| {
                                    let idx = h.display_index;
                                    let label = format!(
                                        "Hand #{} | {} | {} | pot {}",
                                        idx, h.hero_position_label, h.hero_cards_display, h.pot_size_chips
                                    );
                                    view! {
                                        <li
                                            class="p-3 rounded-lg bg-red-50 dark:bg-red-900/20 cursor-pointer"
                                            on:click=move |_| set_selected.set(Some(idx))
                                        >
                                            {label}
                                        </li>
                                    }
                                }).collect_view()
                            })}
                        </ul>
                    </div>
                })}

                {move || (!hands.with(Vec::is_empty)).then(|| view! {
                    <div class="bg-white dark:bg-gray-800 rounded-lg shadow-lg p-6 mb-8">
                        <div class="flex justify-between items-center mb-4">
                            <select
                                class="border rounded-lg p-2 dark:bg-gray-700"
                                on:change=move |ev| {
                                    if let Ok(filter) = event_target_value(&ev).parse::<PrimaryFilter>() {
                                        set_primary.set(filter);
                                    }
                                }
                            >
                                {FILTER_OPTIONS.into_iter().map(|(value, label)| view! {
                                    <option value=value>{label}</option>
                                }).collect_view()}
                            </select>
                            <button
                                class="bg-blue-600 hover:bg-blue-700 text-white font-semibold py-2 px-4 rounded-lg transition-colors"
                                on:click=export_json
                            >
                                "Export JSON"
                            </button>
                        </div>
                        <table class="w-full text-sm">
                            <thead>
                                <tr class="text-left text-gray-500">
                                    <th>"Hand #"</th>
                                    <th>"Position"</th>
                                    <th>"Hole Cards"</th>
                                    <th>"Result"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {move || {
                                    let rows = filtered();
                                    if rows.is_empty() {
                                        return view! {
                                            <tr><td colspan="4">"No hands in this category"</td></tr>
                                        }
                                        .into_any();
                                    }
                                    rows.into_iter().map(|h| {
                                        let idx = h.display_index;
                                        let row_class = if h.outcome == hand_coach_lib::Outcome::Loss {
                                            "cursor-pointer bg-red-50 dark:bg-red-900/20"
                                        } else {
                                            "cursor-pointer"
                                        };
                                        view! {
                                            <tr class=row_class on:click=move |_| set_selected.set(Some(idx))>
                                                <td>{idx}</td>
                                                <td>{h.hero_position_label.label()}</td>
                                                <td>{h.hero_cards_display.clone()}</td>
                                                <td>{h.outcome.label()}</td>
                                            </tr>
                                        }
                                    }).collect_view().into_any()
                                }}
                            </tbody>
                        </table>
                    </div>
                })}

                {move || selected_timeline().map(|tl| view! {
                    <div class="bg-white dark:bg-gray-800 rounded-lg shadow-lg p-6">
                        <div class="flex justify-between items-center mb-4">
                            <h2 class="text-xl font-bold">
                                {format!("Hand #{}", selected.get().unwrap_or_default())}
                            </h2>
                            <button
                                class="bg-gray-200 dark:bg-gray-700 hover:bg-gray-300 text-gray-900 dark:text-white font-semibold py-2 px-4 rounded-lg transition-colors"
                                on:click=copy_fact_sheet
                            >
                                "Copy Fact Sheet"
                            </button>
                        </div>
                        <p class="font-semibold text-gray-700 dark:text-gray-300">{tl.header}</p>
                        {tl.streets.into_iter().map(|street| {
                            let badge = format!("*** {} *** {}", street.street, cards_to_display(&street.board.join(" ")));
                            view! {
                                <div class="mt-4 space-y-1">
                                    <p class="text-xs uppercase tracking-wide text-gray-500">{badge}</p>
                                    {street.actions.into_iter().map(|action| {
                                        let class = if action.is_hero {
                                            "ml-auto w-fit rounded-lg px-3 py-1 bg-blue-600 text-white"
                                        } else {
                                            "w-fit rounded-lg px-3 py-1 bg-gray-100 dark:bg-gray-700"
                                        };
                                        view! { <p class=class>{action.to_string()}</p> }
                                    }).collect_view()}
                                </div>
                            }
                        }).collect_view()}
                    </div>
                })}
            </div>
        </div>
    }
}
