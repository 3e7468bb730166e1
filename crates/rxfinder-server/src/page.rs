//! The chat page. Layout/styling only — all behavior lives behind the
//! session API.

/// Placeholder token for the version label.
const VERSION_TOKEN: &str = "__VERSION__";
/// Placeholder token for the Quit button (local mode only).
const QUIT_TOKEN: &str = "<!--QUIT-->";

const QUIT_BUTTON: &str =
    r#"<button id="quit" class="btn btn-danger" onclick="quitApp()">Quit</button>"#;

const TEMPLATE: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Drug Finder</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 0; background: #f8fafc; color: #111827; }
  .wrap { max-width: 56rem; margin: 0 auto; padding: 1.5rem; }
  .header { display: flex; align-items: center; gap: 0.75rem; }
  .header h1 { font-size: 1.5rem; margin: 0; }
  #dot { color: #9ca3af; font-size: 0.8rem; }
  #dot.ready { color: #22c55e; }
  #tools { color: #4b5563; font-size: 0.9rem; }
  .muted { color: #4b5563; }
  #query { width: 100%; padding: 0.6rem; border: 1px solid #d1d5db; border-radius: 0.5rem; box-sizing: border-box; }
  .btn { padding: 0.5rem 1.25rem; border: none; border-radius: 0.5rem; cursor: pointer; }
  .btn-primary { background: #2563eb; color: white; }
  .btn-neutral { background: #e5e7eb; color: #111827; }
  .btn-danger { background: #dc2626; color: white; }
  #spinner { display: none; margin-top: 0.5rem; color: #2563eb; }
  #chat { height: 20rem; overflow-y: auto; border: 1px solid #d1d5db; border-radius: 0.5rem;
          background: white; padding: 0.75rem; margin-top: 1rem; }
  .row { display: flex; width: 100%; margin: 0.25rem 0; }
  .row.user { justify-content: flex-end; }
  .row.assistant { justify-content: flex-start; }
  .bubble { max-width: 80%; border-radius: 1rem; padding: 0.75rem; white-space: pre-wrap; }
  .user .bubble { background: #eff6ff; border: 1px solid #bfdbfe; }
  .assistant .bubble { background: #f9fafb; border: 1px solid #e5e7eb; }
  .footer { display: flex; justify-content: flex-end; gap: 0.5rem; align-items: center; margin-top: 1rem; }
  .version { color: #9ca3af; font-size: 0.85rem; }
</style>
</head>
<body>
<div class="wrap">
  <div class="header">
    <h1>Drug Finder</h1>
    <span id="dot">&#9679;</span>
    <span id="tools">Tools: &mdash;</span>
  </div>
  <p class="muted">I can help you with information about drugs and medications by
  searching RxNorm, a standardized drug nomenclature database.</p>
  <p class="muted">Here are some sample questions:</p>
  <ul class="muted">
    <li>I think the allergy med is Zertec&mdash;can you find likely matches and let me choose?</li>
    <li>All I remember is &lsquo;omep&hellip;&rsquo; for heartburn. Show 2&ndash;5 likely matches.</li>
    <li>ibuprfen&mdash;what did I probably mean?</li>
    <li>Is Panadol the same as acetaminophen in the US? Show the generic ingredient and branded equivalents.</li>
    <li>I only know the brand Allegra&mdash;show the underlying ingredient and a couple of related products.</li>
  </ul>
  <input id="query" placeholder="Enter your query&hellip;" onkeydown="if(event.key==='Enter')askQuery()">
  <div style="margin-top:0.5rem">
    <button class="btn btn-primary" onclick="askQuery()">Ask</button>
  </div>
  <div id="spinner">Thinking&hellip;</div>
  <div id="chat"></div>
  <div class="footer">
    <button class="btn btn-neutral" onclick="clearChat()">Clear</button>
    <!--QUIT-->
    <span class="version">ver __VERSION__</span>
  </div>
</div>
<script>
let sessionId = null;
let statusTimer = null;

async function init() {
  const res = await fetch('/api/sessions', {method: 'POST'});
  const data = await res.json();
  sessionId = data.sessionId;
  statusTimer = setInterval(updateStatus, 500);
  window.addEventListener('beforeunload', () => {
    navigator.sendBeacon && fetch('/api/sessions/' + sessionId, {method: 'DELETE', keepalive: true});
  });
}

async function updateStatus() {
  if (!sessionId) return;
  const res = await fetch('/api/sessions/' + sessionId + '/status');
  if (!res.ok) return;
  const data = await res.json();
  if (data.toolNames.length > 0) {
    document.getElementById('dot').classList.add('ready');
    document.getElementById('tools').textContent = 'Tools: ' + data.toolNames.join(', ');
    clearInterval(statusTimer);
  }
}

function renderBubbles(bubbles) {
  const chat = document.getElementById('chat');
  chat.innerHTML = '';
  for (const b of bubbles) {
    const row = document.createElement('div');
    row.className = 'row ' + b.role;
    const bubble = document.createElement('div');
    bubble.className = 'bubble';
    bubble.textContent = b.text;
    row.appendChild(bubble);
    chat.appendChild(row);
  }
}

async function askQuery() {
  const box = document.getElementById('query');
  const text = box.value.trim();
  if (!text || !sessionId) return;
  box.value = '';
  // Show the new query at the top right away; the answer bubble follows
  // on the next render.
  const chat = document.getElementById('chat');
  const row = document.createElement('div');
  row.className = 'row user';
  const bubble = document.createElement('div');
  bubble.className = 'bubble';
  bubble.textContent = text;
  row.appendChild(bubble);
  chat.insertBefore(row, chat.firstChild);
  document.getElementById('spinner').style.display = 'block';
  try {
    const res = await fetch('/api/sessions/' + sessionId + '/ask', {
      method: 'POST',
      headers: {'content-type': 'application/json'},
      body: JSON.stringify({text}),
    });
    if (res.ok) {
      const data = await res.json();
      renderBubbles(data.bubbles);
    }
  } finally {
    document.getElementById('spinner').style.display = 'none';
  }
}

async function clearChat() {
  if (!sessionId) return;
  const res = await fetch('/api/sessions/' + sessionId + '/clear', {method: 'POST'});
  if (res.ok) {
    const data = await res.json();
    renderBubbles(data.bubbles);
    document.getElementById('spinner').style.display = 'none';
  }
}

async function quitApp() {
  if (!sessionId) return;
  await fetch('/api/shutdown', {
    method: 'POST',
    headers: {'content-type': 'application/json'},
    body: JSON.stringify({sessionId}),
  });
  document.body.innerHTML = '<div class="wrap"><p>Shut down. You can close this window.</p></div>';
}

init();
</script>
</body>
</html>
"##;

/// Render the page. Hosted deployments get no Quit affordance.
pub fn render(hosted: bool, version: &str) -> String {
    let quit = if hosted { "" } else { QUIT_BUTTON };
    TEMPLATE
        .replace(QUIT_TOKEN, quit)
        .replace(VERSION_TOKEN, version)
}
