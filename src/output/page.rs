use crate::filter::SelectControl;
use crate::render::{html_escape, ids};
use crate::view::Frame;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageOptions {
    pub title: String,
    /// Path the browser binding fetches the dataset from.
    pub data_path: String,
    /// ES module emitted by wasm-bindgen for the browser binding.
    pub script_path: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: "Organization Directory".to_string(),
            data_path: crate::loader::DEFAULT_DATA_PATH.to_string(),
            script_path: "pkg/orgdir.js".to_string(),
        }
    }
}

const STYLES: &str = r#"
    * { box-sizing: border-box; }
    body { margin: 0; font-family: system-ui, -apple-system, "Segoe UI", sans-serif; background: #f5f7fa; color: #1f2933; }
    body.modal-open { overflow: hidden; }
    header { background: #1f3a5f; color: #fff; padding: 1.5rem 2rem; }
    header h1 { margin: 0; font-size: 1.6rem; }
    main { max-width: 1280px; margin: 0 auto; padding: 1.5rem 2rem; }
    .filters { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 0.75rem; background: #fff; padding: 1rem; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
    .filters.collapsed { display: none; }
    .search-box { position: relative; }
    .search-box input, .filters select { width: 100%; padding: 0.55rem 0.7rem; border: 1px solid #cbd2d9; border-radius: 6px; font-size: 0.95rem; }
    .clear-search { position: absolute; right: 0.4rem; top: 50%; transform: translateY(-50%); border: 0; background: none; font-size: 1.1rem; cursor: pointer; display: none; }
    .clear-search.visible { display: block; }
    .toggle-filters { display: none; margin-bottom: 0.75rem; }
    .stats-bar { display: flex; flex-wrap: wrap; align-items: center; gap: 0.5rem; margin: 1rem 0; }
    .active-filters { display: flex; flex-wrap: wrap; gap: 0.4rem; }
    .filter-badge { display: inline-flex; align-items: center; gap: 0.3rem; background: #e4ecf7; border-radius: 999px; padding: 0.2rem 0.6rem; font-size: 0.85rem; }
    .filter-badge-remove { border: 0; background: none; cursor: pointer; font-size: 1rem; }
    .loading { display: none; padding: 1rem; text-align: center; color: #52606d; }
    .loading.active { display: block; }
    .cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 1rem; }
    .card { background: #fff; border-radius: 8px; padding: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,.08); display: flex; flex-direction: column; gap: 0.6rem; }
    .card-title { margin: 0; font-size: 1.1rem; }
    .card-badges-section { display: flex; flex-wrap: wrap; gap: 0.6rem; }
    .badge-label, .focus-label, .detail-label { font-size: 0.7rem; text-transform: uppercase; color: #7b8794; }
    .card-domain, .card-region-badge, .card-country-badge, .focus-tag, .detail-tag { display: inline-block; border-radius: 4px; padding: 0.1rem 0.45rem; font-size: 0.8rem; background: #eef2f7; margin: 0.1rem 0.2rem 0 0; }
    .card-domain { background: #1f3a5f; color: #fff; }
    .card-overview { font-size: 0.92rem; line-height: 1.45; }
    .card-overview-empty { color: #9aa5b1; font-style: italic; }
    .btn-expand { border: 0; background: none; color: #2f6fb2; cursor: pointer; padding: 0; }
    .card-info-panel { background: #fff4e5; border-left: 3px solid #e8a33d; padding: 0.5rem; font-size: 0.85rem; }
    .card-footer { margin-top: auto; display: flex; justify-content: space-between; gap: 0.5rem; }
    .btn { border-radius: 6px; padding: 0.45rem 0.9rem; font-size: 0.9rem; cursor: pointer; border: 1px solid transparent; text-decoration: none; }
    .btn-primary { background: #2f6fb2; color: #fff; }
    .btn-secondary { background: #fff; color: #1f3a5f; border-color: #cbd2d9; }
    .no-results { grid-column: 1 / -1; text-align: center; padding: 3rem 1rem; color: #52606d; }
    .modal { display: none; position: fixed; inset: 0; background: rgba(15,23,42,.55); align-items: center; justify-content: center; padding: 1rem; }
    .modal.active { display: flex; }
    .modal-content { background: #fff; border-radius: 10px; max-width: 760px; width: 100%; max-height: 90vh; overflow-y: auto; }
    .modal-header, .modal-body, .modal-footer { padding: 1rem 1.25rem; }
    .modal-footer { display: flex; justify-content: flex-end; gap: 0.5rem; border-top: 1px solid #e4e7eb; }
    .detail-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 0.75rem; }
    .detail-section { margin-top: 1rem; }
    .detail-divider { border: 0; border-top: 1px solid #e4e7eb; margin: 1rem 0; }
    .flagged-badge { display: inline-block; background: #fde8e8; color: #9b1c1c; border-radius: 4px; padding: 0.2rem 0.5rem; font-size: 0.8rem; }
    @media (max-width: 720px) {
      main { padding: 1rem; }
      .toggle-filters { display: inline-block; }
    }
"#;

/// Complete document for a frame. The browser binding takes over from the
/// embedded markup once its module has loaded.
pub fn render_page(frame: &Frame, options: &PageOptions) -> String {
    let title = html_escape(&options.title);
    let selects = SelectControl::ALL
        .iter()
        .map(|&control| {
            format!(
                r#"<select id="{}" aria-label="{}">{}</select>"#,
                control.element_id(),
                control.any_label(),
                frame.options(control)
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ");

    let modal = frame.modal.as_ref();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{title}</title>
  <style>{styles}</style>
</head>
<body{body_class}>
  <header><h1>{title}</h1></header>
  <main>
    <button id="{toggle_id}" class="btn btn-secondary toggle-filters" type="button">Filters</button>
    <section id="{filters_id}" class="filters{collapsed}">
      <div class="search-box">
        <input id="{search_id}" type="search" placeholder="Search organizations..." value="{search}" autocomplete="off"/>
        <button id="{clear_id}" class="clear-search{clear_visible}" type="button" aria-label="Clear search">&times;</button>
      </div>
        {selects}
      <label><input id="{flagged_id}" type="checkbox"{flagged_checked}/> Show flagged records</label>
      <button id="{reset_id}" class="btn btn-secondary" type="button">Reset Filters</button>
    </section>
    <div class="stats-bar">
      <span id="{count_id}">{stats}</span>
      <div id="{badges_id}" class="active-filters">{badges}</div>
    </div>
    <div id="{loading_id}" class="loading{loading}">Loading...</div>
    <div id="{cards_id}" class="cards" data-source="{data}">{cards}</div>
  </main>
  <div id="{modal_id}" class="modal{modal_active}">
    <div class="modal-content">
      <div class="modal-header"><h2 id="{modal_title_id}">{modal_title}</h2></div>
      <div id="{modal_body_id}" class="modal-body">{modal_body}</div>
      <div id="{modal_footer_id}" class="modal-footer">{modal_footer}</div>
    </div>
  </div>
  <script type="module">
    import init from "./{script}";
    init().catch((err) => console.error(err));
  </script>
  <noscript>Live filtering needs JavaScript. Data: <a href="{data}">{data}</a></noscript>
</body>
</html>
"#,
        styles = STYLES,
        body_class = if frame.scroll_locked { r#" class="modal-open""# } else { "" },
        toggle_id = ids::TOGGLE_FILTERS,
        filters_id = ids::FILTERS,
        collapsed = if frame.filters_collapsed { " collapsed" } else { "" },
        search_id = ids::SEARCH_INPUT,
        search = html_escape(&frame.search),
        clear_id = ids::CLEAR_SEARCH,
        clear_visible = if frame.clear_search_visible { " visible" } else { "" },
        flagged_id = ids::FLAGGED_TOGGLE,
        flagged_checked = if frame.show_flagged { " checked" } else { "" },
        reset_id = ids::RESET_FILTERS,
        count_id = ids::RESULT_COUNT,
        stats = html_escape(&frame.stats),
        badges_id = ids::ACTIVE_FILTERS,
        badges = frame.badges,
        loading_id = ids::LOADING,
        loading = if frame.loading { " active" } else { "" },
        cards_id = ids::CARDS,
        cards = frame.cards,
        modal_id = ids::MODAL,
        modal_active = if modal.is_some() { " active" } else { "" },
        modal_title_id = ids::MODAL_TITLE,
        modal_title = modal.map(|m| html_escape(&m.title)).unwrap_or_default(),
        modal_body_id = ids::MODAL_BODY,
        modal_body = modal.map(|m| m.body.as_str()).unwrap_or_default(),
        modal_footer_id = ids::MODAL_FOOTER,
        modal_footer = modal.map(|m| m.footer.as_str()).unwrap_or_default(),
        script = html_escape(&options.script_path),
        data = html_escape(&options.data_path),
    )
}
