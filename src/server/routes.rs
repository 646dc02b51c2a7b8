use crate::server::api::{self, ApiError};
use crate::server::session::AppState;

pub struct HttpResponse {
    pub status_code: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn ok(content_type: &'static str, body: String) -> Self {
        Self {
            status_code: 200,
            content_type,
            body,
        }
    }

    fn json(body: String) -> Self {
        Self::ok("application/json", body)
    }
}

fn respond(result: Result<String, ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::json(payload),
        Err(err) => api_error_response(&err),
    }
}

pub fn route_request(state: &AppState, method: &str, path: &str, body: &str) -> HttpResponse {
    let route = path.split('?').next().unwrap_or(path);
    let route = if route.len() > 1 {
        route.trim_end_matches('/')
    } else {
        route
    };

    match (method, route) {
        ("GET", "/") => HttpResponse::ok("text/html; charset=utf-8", index_html()),
        ("GET", "/api/health") => respond(api::health_payload()),
        ("GET", "/api/abilities") => respond(api::abilities_payload(state, path)),
        ("GET", "/api/abilities/load-all") | ("POST", "/api/abilities") => {
            respond(api::load_all_payload(state))
        }
        ("GET", "/api/budget") => respond(api::budget_payload(state, path)),
        ("GET", "/api/session") => respond(api::session_payload(state)),
        ("POST", "/api/session/catalog") => respond(api::select_catalog_payload(state, body)),
        ("POST", "/api/session/setup") => respond(api::setup_payload(state, body)),
        ("PUT", "/api/session/character") => respond(api::update_character_payload(state, body)),
        ("PUT", "/api/session/character/abilities") => {
            respond(api::set_rating_payload(state, body))
        }
        ("POST", "/api/session/next") => respond(api::next_payload(state)),
        ("POST", "/api/session/back") => respond(api::back_payload(state)),
        ("POST", "/api/session/edit") => respond(api::edit_payload(state)),
        ("POST", "/api/session/reset") => respond(api::reset_payload(state)),
        ("GET", "/api/session/usage") => respond(api::usage_payload(state, path)),
        ("GET", "/api/session/sheets") => match api::sheets_payload(state, path) {
            Ok((format, payload)) => HttpResponse::ok(format.content_type(), payload),
            Err(err) => api_error_response(&err),
        },
        _ => error_response(404, "Route not found"),
    }
}

fn api_error_response(err: &ApiError) -> HttpResponse {
    let status_code = err.status();
    if status_code >= 500 {
        tracing::error!(error = %err, "request failed");
    } else {
        tracing::debug!(error = %err, status_code, "request rejected");
    }

    let mut payload = serde_json::json!({
        "status": "error",
        "message": err.to_string(),
    });
    if let Some(issues) = err.issues() {
        payload["issues"] = serde_json::to_value(issues).unwrap_or_default();
    }

    let fallback =
        "{\n  \"status\": \"error\",\n  \"message\": \"Request failed\"\n}".to_string();
    HttpResponse {
        status_code,
        content_type: "application/json",
        body: serde_json::to_string_pretty(&payload).unwrap_or(fallback),
    }
}

fn error_response(status_code: u16, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Gumshoe Character Creator</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    h1 { margin-bottom: 8px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    .banner { background: #fdecea; border: 1px solid #e57373; padding: 8px 12px; border-radius: 6px; display: none; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    input, select, textarea { width: 100%; padding: 8px; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 14px; }
    pre { background: #111; color: #aef2ae; padding: 12px; overflow: auto; border-radius: 6px; min-height: 180px; }
  </style>
</head>
<body>
  <h1>Gumshoe Character Creator</h1>
  <p>Create characters for the Gumshoe TTRPG system.</p>
  <div id="banner" class="banner"></div>

  <div class="card">
    <strong>Setup</strong>
    <label for="catalog">Abilities file</label>
    <select id="catalog"><option value="">All files</option></select>
    <button id="catalog-btn">Load abilities</button>
    <label for="players">Number of players (1-6)</label>
    <input id="players" type="number" min="1" max="6" value="4" />
    <p id="budget" style="margin:8px 0 0;font-size:0.9rem;color:#666;"></p>
    <button id="setup-btn">Start character creation</button>
  </div>

  <div class="card">
    <strong>Current character</strong>
    <label for="name">Name *</label>
    <input id="name" />
    <label for="motivation">Motivation</label>
    <input id="motivation" />
    <label for="background">Background</label>
    <textarea id="background" rows="3"></textarea>
    <button id="save-btn">Save details</button>
    <label for="ability">Ability</label>
    <input id="ability" placeholder="e.g. Law" />
    <label for="category">Category</label>
    <select id="category"><option>investigative</option><option>general</option></select>
    <label for="rating">Rating</label>
    <input id="rating" type="number" min="0" value="1" />
    <button id="rate-btn">Set rating</button>
    <div>
      <button id="back-btn">Previous character</button>
      <button id="next-btn">Next character</button>
    </div>
  </div>

  <div class="card">
    <strong>Sheets</strong>
    <label for="sheet-character">Character number (blank for the whole party)</label>
    <input id="sheet-character" type="number" min="1" max="6" />
    <div>
      <button id="edit-btn">Edit characters</button>
      <button id="reset-btn">Start over</button>
      <button id="print-btn">Open printable sheets</button>
    </div>
  </div>

  <pre id="output">Ready.</pre>

  <script>
    const output = document.getElementById('output');
    const banner = document.getElementById('banner');
    const value = (id) => document.getElementById(id).value;

    function show(status, data) {
      output.textContent = 'HTTP ' + status + '\n' + JSON.stringify(data, null, 2);
      const message = data && (data.catalog_error || (data.status === 'error' ? data.message : null));
      banner.style.display = message ? 'block' : 'none';
      banner.textContent = message || '';
      if (data && data.current) {
        const c = data.current.character;
        document.getElementById('name').value = c.name;
        document.getElementById('motivation').value = c.motivation;
        document.getElementById('background').value = c.background;
      }
    }

    async function call(method, path, payload) {
      const options = { method, headers: { 'Content-Type': 'application/json' } };
      if (payload !== undefined) options.body = JSON.stringify(payload);
      const response = await fetch(path, options);
      const data = await response.json().catch(() => null);
      show(response.status, data);
      return data;
    }

    async function refreshBudget() {
      const players = Number(value('players'));
      const response = await fetch('/api/budget?players=' + players);
      const el = document.getElementById('budget');
      if (!response.ok) { el.textContent = ''; return; }
      const data = await response.json();
      el.textContent = 'Investigative: ' + data.investigative + ' points, General: ' + data.general + ' points';
    }

    fetch('/api/abilities').then(r => r.ok ? r.json() : []).then(files => {
      const select = document.getElementById('catalog');
      files.forEach(f => {
        const label = f.replace(/\.json$/, '').split('-').map(w => w.charAt(0).toUpperCase() + w.slice(1)).join(' ');
        const opt = document.createElement('option');
        opt.value = f; opt.textContent = label; select.appendChild(opt);
      });
    });

    document.getElementById('players').addEventListener('input', refreshBudget);
    document.getElementById('catalog-btn').addEventListener('click', async () => {
      const file = value('catalog');
      await call('POST', '/api/session/catalog', file ? { file } : {});
      refreshBudget();
    });
    document.getElementById('setup-btn').addEventListener('click', () =>
      call('POST', '/api/session/setup', { players: Number(value('players')) }));
    document.getElementById('save-btn').addEventListener('click', () =>
      call('PUT', '/api/session/character', { name: value('name'), motivation: value('motivation'), background: value('background') }));
    document.getElementById('rate-btn').addEventListener('click', () =>
      call('PUT', '/api/session/character/abilities', { category: value('category'), ability: value('ability'), rating: Number(value('rating')) }));
    document.getElementById('back-btn').addEventListener('click', () => call('POST', '/api/session/back'));
    document.getElementById('next-btn').addEventListener('click', () => call('POST', '/api/session/next'));
    document.getElementById('edit-btn').addEventListener('click', () => call('POST', '/api/session/edit'));
    document.getElementById('reset-btn').addEventListener('click', () => call('POST', '/api/session/reset'));
    document.getElementById('print-btn').addEventListener('click', () => {
      const n = value('sheet-character');
      window.open('/api/session/sheets?format=html' + (n ? '&character=' + n : ''), '_blank');
    });

    call('GET', '/api/session');
    refreshBudget();
  </script>
</body>
</html>
"#
    .to_string()
}
