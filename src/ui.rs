use crate::models::AppData;
use crate::plan;

pub fn render_index(data: &AppData) -> String {
    let has_plan = data.plan.is_some();
    let day = plan::current_day(data).unwrap_or(1);
    let weight = plan::current_weight(data)
        .map(|w| w.to_string())
        .unwrap_or_else(|| "--".to_string());
    let lost = plan::weight_lost(data).unwrap_or_else(|| "--".to_string());
    INDEX_HTML
        .replace("{{HAS_PLAN}}", if has_plan { "true" } else { "false" })
        .replace("{{DAY}}", &day.to_string())
        .replace("{{PHASE}}", plan::current_phase())
        .replace("{{WEIGHT}}", &weight)
        .replace("{{LOST}}", &lost)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Dukan Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef6ef;
      --bg-2: #cdebd9;
      --ink: #24302a;
      --accent: #10b981;
      --accent-2: #2f4f46;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(47, 79, 70, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    [hidden] {
      display: none !important;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e4f3e6 60%, #f2f7ef 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
      animation: rise 600ms ease;
    }

    header {
      display: flex;
      flex-direction: column;
      gap: 6px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    h2 {
      margin: 0;
      font-size: 1.2rem;
    }

    .subtitle {
      margin: 0;
      color: #5c6a61;
      font-size: 1rem;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 79, 70, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat span {
      display: block;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #7d8a80;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .stat .value.lost {
      color: var(--accent);
    }

    .field {
      display: grid;
      gap: 8px;
    }

    .field .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #7d8a80;
    }

    input,
    select {
      font: inherit;
      color: inherit;
      background: white;
      border: 1px solid rgba(47, 79, 70, 0.18);
      border-radius: 14px;
      padding: 13px 16px;
      width: 100%;
    }

    input:focus,
    select:focus {
      outline: 2px solid var(--accent);
      border-color: transparent;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 16px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      transition: transform 150ms ease, box-shadow 150ms ease;
      display: inline-flex;
      align-items: center;
      justify-content: center;
      gap: 10px;
    }

    button:active {
      transform: scale(0.98);
    }

    .btn-save {
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(16, 185, 129, 0.3);
    }

    .btn-reset {
      background: white;
      color: #c63b2b;
      border: 1px solid rgba(198, 59, 43, 0.4);
      box-shadow: none;
    }

    .setup-form {
      display: grid;
      gap: 16px;
    }

    .actions {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
      gap: 16px;
    }

    .action-card {
      background: white;
      border-radius: 20px;
      padding: 18px;
      border: 1px solid rgba(47, 79, 70, 0.08);
      display: grid;
      gap: 12px;
    }

    .weight-row {
      display: flex;
      gap: 10px;
    }

    .weight-row input {
      flex: 1;
    }

    .slots {
      display: flex;
      gap: 10px;
    }

    .slot {
      flex: 1;
      padding: 12px 0;
      border-radius: 16px;
      background: white;
      border: 2px solid rgba(47, 79, 70, 0.15);
      font-size: 1.2rem;
      box-shadow: none;
    }

    .slot.filled {
      background: var(--accent);
      border-color: transparent;
      color: white;
      box-shadow: 0 10px 24px rgba(16, 185, 129, 0.3);
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 79, 70, 0.08);
      border-radius: 999px;
    }

    .tab {
      flex: 1;
      background: transparent;
      border: none;
      border-radius: 999px;
      padding: 8px 14px;
      font-size: 0.9rem;
      font-weight: 600;
      color: #66716a;
      box-shadow: none;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(47, 79, 70, 0.12);
    }

    .view {
      display: grid;
      gap: 16px;
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 16px;
      border: 1px solid rgba(47, 79, 70, 0.08);
    }

    #chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    #chart text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
      stroke-linejoin: round;
    }

    .chart-fill {
      fill: rgba(16, 185, 129, 0.14);
      stroke: none;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(47, 79, 70, 0.12);
    }

    .chart-label {
      fill: #74807a;
      font-size: 11px;
    }

    .chart-metrics {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .list {
      display: grid;
      gap: 10px;
    }

    .item {
      background: white;
      border-radius: 16px;
      padding: 14px 18px;
      border: 1px solid rgba(47, 79, 70, 0.08);
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .item-name {
      font-weight: 600;
    }

    .item-sub {
      display: block;
      font-size: 0.85rem;
      color: #7d8a80;
    }

    .pill {
      border-radius: 999px;
      padding: 4px 12px;
      font-size: 0.8rem;
      font-weight: 600;
      flex-shrink: 0;
    }

    .pill-attack {
      background: rgba(16, 185, 129, 0.14);
      color: var(--accent-2);
    }

    .pill-cruise {
      background: rgba(226, 160, 63, 0.2);
      color: #8a5a14;
    }

    .recipe {
      background: white;
      border-radius: 20px;
      padding: 18px;
      border: 1px solid rgba(47, 79, 70, 0.08);
      display: grid;
      gap: 10px;
    }

    .recipe-head {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 10px;
    }

    .recipe-ingredients {
      margin: 0;
      font-style: italic;
      color: #5c6a61;
      border-left: 3px solid rgba(16, 185, 129, 0.3);
      padding-left: 12px;
    }

    .recipe-steps {
      margin: 0;
      color: #44514a;
    }

    .plan-rows {
      background: white;
      border-radius: 20px;
      border: 1px solid rgba(47, 79, 70, 0.08);
      padding: 6px 18px;
    }

    .plan-row {
      display: flex;
      justify-content: space-between;
      padding: 12px 0;
      border-bottom: 1px solid rgba(47, 79, 70, 0.08);
    }

    .plan-row:last-child {
      border-bottom: none;
    }

    .plan-row .muted {
      color: #7d8a80;
    }

    .status {
      font-size: 0.95rem;
      color: #66716a;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .hint {
      margin: 0;
      color: #6f7a72;
      font-size: 0.9rem;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
      .weight-row {
        flex-direction: column;
      }
      .weight-row button {
        width: 100%;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <section id="setup" hidden>
      <header>
        <h1>Dukan Tracker</h1>
        <p class="subtitle">Enter your current and target weight; the phase plan is derived from the difference.</p>
      </header>
      <form id="plan-form" class="setup-form" method="post" action="/plan">
        <label class="field">
          <span class="label">Current weight, kg</span>
          <input id="start-weight" name="start_weight" inputmode="decimal" placeholder="85" autocomplete="off" />
        </label>
        <label class="field">
          <span class="label">Target weight, kg</span>
          <input id="target-weight" name="target_weight" inputmode="decimal" placeholder="70" autocomplete="off" />
        </label>
        <label class="field">
          <span class="label">Cruise rhythm (protein / protein+veg days)</span>
          <select id="rhythm" name="rhythm">
            <option value="1/1" selected>1/1 (recommended)</option>
            <option value="2/2">2/2</option>
            <option value="5/5">5/5</option>
          </select>
        </label>
        <button class="btn-save" type="submit">Calculate my plan</button>
      </form>
    </section>

    <section id="tracker" hidden>
      <header>
        <h1>Dukan Tracker</h1>
        <p class="subtitle">Log your weight and water, check what is allowed, stay on phase.</p>
      </header>

      <section class="panel">
        <div class="stat">
          <span class="label">Day</span>
          <span id="day" class="value">{{DAY}}</span>
        </div>
        <div class="stat">
          <span class="label">Phase</span>
          <span id="phase" class="value">{{PHASE}}</span>
        </div>
        <div class="stat">
          <span class="label">Weight</span>
          <span id="weight" class="value">{{WEIGHT}} kg</span>
        </div>
        <div class="stat">
          <span class="label">Lost</span>
          <span id="lost" class="value lost">{{LOST}} kg</span>
        </div>
      </section>

      <section class="actions">
        <form id="weight-form" class="action-card" method="post" action="/api/weight">
          <h2>Today's weigh-in</h2>
          <div class="weight-row">
            <input id="weight-input" inputmode="decimal" placeholder="72.5" autocomplete="off" />
            <button class="btn-save" id="weight-btn" type="submit">Save</button>
          </div>
        </form>
        <div class="action-card">
          <h2>Water today</h2>
          <div class="slots" id="slots"></div>
          <p class="hint">Tap a glass to fill up to it; tap the last filled glass to empty it back.</p>
        </div>
      </section>

      <div class="tabs" role="tablist">
        <button class="tab active" type="button" data-tab="overview" role="tab" aria-selected="true">Overview</button>
        <button class="tab" type="button" data-tab="foods" role="tab" aria-selected="false">Foods</button>
        <button class="tab" type="button" data-tab="recipes" role="tab" aria-selected="false">Recipes</button>
        <button class="tab" type="button" data-tab="plan" role="tab" aria-selected="false">Plan</button>
      </div>

      <section class="view" id="view-overview">
        <div class="chart-card">
          <svg id="chart" viewBox="0 0 600 260" aria-label="Weight chart" role="img"></svg>
        </div>
        <div class="chart-metrics">
          <div class="stat">
            <span class="label">Start</span>
            <span class="value" id="metric-start">--</span>
          </div>
          <div class="stat">
            <span class="label">Target</span>
            <span class="value" id="metric-target">--</span>
          </div>
          <div class="stat">
            <span class="label">To go</span>
            <span class="value lost" id="metric-togo">--</span>
          </div>
        </div>
      </section>

      <section class="view" id="view-foods" hidden>
        <input id="food-search" placeholder="Search allowed foods" autocomplete="off" />
        <div class="list" id="food-list"></div>
      </section>

      <section class="view" id="view-recipes" hidden>
        <div class="list" id="recipe-list"></div>
      </section>

      <section class="view" id="view-plan" hidden>
        <div class="plan-rows" id="plan-rows"></div>
        <button class="btn-reset" id="reset-btn" type="button">Reset plan and all data</button>
      </section>
    </section>

    <div class="status" id="status"></div>
    <p class="hint">Water is kept per calendar day (server time). Weigh-ins stay for the whole plan.</p>
  </main>

  <script>
    const HAS_PLAN = {{HAS_PLAN}};
    const WATER_SLOTS = 5;

    const setupEl = document.getElementById('setup');
    const trackerEl = document.getElementById('tracker');
    const dayEl = document.getElementById('day');
    const phaseEl = document.getElementById('phase');
    const weightEl = document.getElementById('weight');
    const lostEl = document.getElementById('lost');
    const weightInput = document.getElementById('weight-input');
    const slotsEl = document.getElementById('slots');
    const statusEl = document.getElementById('status');
    const chartEl = document.getElementById('chart');
    const metricStart = document.getElementById('metric-start');
    const metricTarget = document.getElementById('metric-target');
    const metricTogo = document.getElementById('metric-togo');
    const foodSearch = document.getElementById('food-search');
    const foodList = document.getElementById('food-list');
    const recipeList = document.getElementById('recipe-list');
    const planRows = document.getElementById('plan-rows');
    const tabs = Array.from(document.querySelectorAll('.tab'));
    const views = Array.from(document.querySelectorAll('.view'));

    let summaryData = null;
    let planData = null;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const formatAxisValue = (value) => {
      const rounded = Math.round(value * 10) / 10;
      return Number.isInteger(rounded) ? rounded.toString() : rounded.toFixed(1);
    };

    const dayLabel = (ms) => new Date(ms).toISOString().slice(5, 10);

    const renderLineChart = (points) => {
      if (!points.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No weigh-ins yet</text>';
        return;
      }

      const width = 600;
      const height = 260;
      const paddingX = 44;
      const paddingY = 34;
      const top = 24;

      const values = points.map((point) => point.value);
      let min = Math.min(...values);
      let max = Math.max(...values);
      if (min === max) {
        min -= 1;
        max += 1;
      }

      const range = max - min;
      const xStep = points.length > 1 ? (width - paddingX * 2) / (points.length - 1) : 0;
      const scaleY = (height - top - paddingY) / range;
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - (value - min) * scaleY;

      const path = points
        .map((point, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(point.value).toFixed(2)}`)
        .join(' ');
      const floor = height - paddingY;
      const area = `${path} L ${x(points.length - 1).toFixed(2)} ${floor} L ${x(0).toFixed(2)} ${floor} Z`;

      const ticks = 4;
      let grid = '';
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + (range * i) / ticks;
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${formatAxisValue(value)}</text>`;
      }

      const labelEvery = points.length > 8 ? Math.ceil(points.length / 8) : 1;
      const xLabels = points
        .map((point, index) => {
          if (index % labelEvery !== 0) {
            return '';
          }
          return `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${point.label}</text>`;
        })
        .join('');

      const circles = points
        .map((point, index) => `<circle class="chart-point" cx="${x(index)}" cy="${y(point.value)}" r="4" />`)
        .join('');

      chartEl.setAttribute('viewBox', `0 0 ${width} ${height}`);
      chartEl.innerHTML = `
        ${grid}
        <path class="chart-fill" d="${area}" />
        <path class="chart-line" d="${path}" />
        ${circles}
        ${xLabels}
      `;
    };

    const renderWater = (count) => {
      let slots = '';
      for (let i = 0; i < WATER_SLOTS; i += 1) {
        const filled = i < count;
        slots += `<button class="slot${filled ? ' filled' : ''}" type="button" data-slot="${i}" aria-pressed="${filled}">${i + 1}</button>`;
      }
      slotsEl.innerHTML = slots;
    };

    const renderMetrics = () => {
      if (!planData || !summaryData) {
        return;
      }
      const togo = Math.max(summaryData.current_weight - planData.target_weight, 0);
      metricStart.textContent = `${planData.start_weight} kg`;
      metricTarget.textContent = `${planData.target_weight} kg`;
      metricTogo.textContent = `${formatAxisValue(togo)} kg`;
    };

    const updateUI = (data) => {
      summaryData = data;
      dayEl.textContent = data.day;
      phaseEl.textContent = data.phase;
      weightEl.textContent = `${data.current_weight} kg`;
      lostEl.textContent = `${data.weight_lost} kg`;
      renderWater(data.water_today);
      renderLineChart(data.logs.map((entry) => ({ label: dayLabel(entry.date), value: entry.weight })));
      renderMetrics();
    };

    const renderFoods = (foods) => {
      if (!foods.length) {
        foodList.innerHTML = '<p class="hint">Nothing matches that search.</p>';
        return;
      }
      foodList.innerHTML = foods
        .map((food) => {
          const pill = food.phase === 'A' ? 'pill-attack' : 'pill-cruise';
          const from = food.phase === 'A' ? 'from Attack' : 'from Cruise';
          return `<div class="item"><span><span class="item-name">${food.name}</span><span class="item-sub">${food.category}</span></span><span class="pill ${pill}">${from}</span></div>`;
        })
        .join('');
    };

    const renderRecipes = (recipes) => {
      recipeList.innerHTML = recipes
        .map((recipe) => {
          const pill = recipe.phase === 'A' ? 'pill-attack' : 'pill-cruise';
          return `<div class="recipe"><div class="recipe-head"><span class="pill ${pill}">Phase ${recipe.phase}</span><span class="item-sub">${recipe.time}</span></div><span class="item-name">${recipe.title}</span><p class="recipe-ingredients">${recipe.ingredients}</p><p class="recipe-steps">${recipe.steps}</p></div>`;
        })
        .join('');
    };

    const renderPlan = () => {
      if (!planData) {
        return;
      }
      planRows.innerHTML = `
        <div class="plan-row"><span>Attack</span><span class="muted">${planData.attack_days} days</span></div>
        <div class="plan-row"><span>Cruise</span><span class="muted">~${planData.cruise_days} days</span></div>
        <div class="plan-row"><span>Consolidation</span><span class="muted">${planData.consolidation_days} days</span></div>
        <div class="plan-row"><span>Rhythm</span><span class="muted">${planData.rhythm}</span></div>
        <div class="plan-row"><span>Started</span><span class="muted">${new Date(planData.start_date).toISOString().slice(0, 10)}</span></div>
        <div class="plan-row"><span>Goal</span><span class="muted">${planData.start_weight} to ${planData.target_weight} kg</span></div>
      `;
      renderMetrics();
    };

    const setActiveTab = (tab) => {
      tabs.forEach((button) => {
        const isActive = button.dataset.tab === tab;
        button.classList.toggle('active', isActive);
        button.setAttribute('aria-selected', String(isActive));
      });
      views.forEach((view) => {
        view.hidden = view.id !== `view-${tab}`;
      });
    };

    const postJson = async (url, body) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body)
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.json();
    };

    const loadSummary = async () => {
      const res = await fetch('/api/summary');
      if (!res.ok) {
        throw new Error('Unable to load summary');
      }
      updateUI(await res.json());
    };

    const loadPlan = async () => {
      const res = await fetch('/api/plan');
      if (!res.ok) {
        throw new Error('Unable to load plan');
      }
      planData = await res.json();
      renderPlan();
    };

    const loadFoods = async (query) => {
      const res = await fetch(`/api/foods?q=${encodeURIComponent(query)}`);
      if (!res.ok) {
        throw new Error('Unable to load foods');
      }
      renderFoods(await res.json());
    };

    const loadRecipes = async () => {
      const res = await fetch('/api/recipes');
      if (!res.ok) {
        throw new Error('Unable to load recipes');
      }
      renderRecipes(await res.json());
    };

    const saveWeight = async () => {
      setStatus('Saving...', 'info');
      const data = await postJson('/api/weight', { weight: weightInput.value });
      weightInput.value = '';
      updateUI(data);
      setStatus('Saved', 'ok');
      setTimeout(() => setStatus('', ''), 1200);
    };

    const toggleWater = async (slot) => {
      const data = await postJson('/api/water', { slot });
      if (summaryData) {
        summaryData.water_today = data.count;
      }
      renderWater(data.count);
    };

    const createPlan = async () => {
      setStatus('Saving...', 'info');
      await postJson('/api/plan', {
        start_weight: document.getElementById('start-weight').value,
        target_weight: document.getElementById('target-weight').value,
        rhythm: document.getElementById('rhythm').value
      });
      window.location.reload();
    };

    const resetAll = async () => {
      if (!window.confirm('Delete the plan and every logged entry?')) {
        return;
      }
      await postJson('/api/reset', {});
      window.location.reload();
    };

    const refresh = async () => {
      await Promise.all([loadSummary(), loadPlan(), loadFoods(''), loadRecipes()]);
    };

    tabs.forEach((button) => {
      button.addEventListener('click', () => setActiveTab(button.dataset.tab));
    });

    slotsEl.addEventListener('click', (event) => {
      const slot = event.target.dataset.slot;
      if (slot === undefined) {
        return;
      }
      toggleWater(Number(slot)).catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('weight-form').addEventListener('submit', (event) => {
      event.preventDefault();
      saveWeight().catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('plan-form').addEventListener('submit', (event) => {
      event.preventDefault();
      createPlan().catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('reset-btn').addEventListener('click', () => {
      resetAll().catch((err) => setStatus(err.message, 'error'));
    });

    foodSearch.addEventListener('input', () => {
      loadFoods(foodSearch.value).catch((err) => setStatus(err.message, 'error'));
    });

    if (HAS_PLAN) {
      trackerEl.hidden = false;
      refresh().catch((err) => setStatus(err.message, 'error'));
    } else {
      setupEl.hidden = false;
    }
  </script>
</body>
</html>
"#;
