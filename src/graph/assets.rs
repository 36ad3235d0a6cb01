/// Embedded web assets for the flow graph pages

/// Styles shared by both pages, including the tooltip tables built by the view module.
pub const STYLE: &str = r#"
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            background: #fafafa;
            color: #222;
            overflow: hidden;
        }

        #container {
            display: flex;
            height: 100vh;
        }

        #graph {
            flex: 1;
        }

        #sidebar {
            width: 280px;
            background: #fff;
            border-left: 1px solid #ddd;
            padding: 20px;
            overflow-y: auto;
        }

        h2 {
            font-size: 0.9em;
            margin: 15px 0 8px;
            color: #666;
            text-transform: uppercase;
            letter-spacing: 1px;
        }

        .control {
            display: flex;
            justify-content: space-between;
            align-items: center;
            padding: 6px 0;
        }

        .control select {
            width: 120px;
        }

        button {
            width: 100%;
            margin-top: 8px;
            padding: 6px;
            cursor: pointer;
        }

        #positions {
            display: none;
            width: 100%;
            height: 200px;
            margin-top: 8px;
            font-family: monospace;
            font-size: 11px;
        }

        #positions.visible {
            display: block;
        }

        #status {
            margin-top: 12px;
            font-size: 0.8em;
            color: #b00;
        }

        .tooltip-wrapper {
            font-size: 12px;
        }

        .tooltip-title {
            font-size: 14px;
            font-weight: bold;
            margin-bottom: 4px;
        }

        .tooltip-table-title {
            font-weight: bold;
        }

        .tooltip-body-wrapper {
            display: flex;
            gap: 16px;
        }

        .tooltip-table {
            border-collapse: collapse;
        }

        .tooltip-table th,
        .tooltip-table td {
            border: 1px solid #ccc;
            padding: 2px 6px;
            text-align: right;
        }

        .tooltip-table th:first-child,
        .tooltip-table td:first-child {
            text-align: left;
        }
"#;

/// Interactive page served by `flowmap serve`. Every chart event is posted to the server, which
/// answers with the next option.
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>flowmap</title>
    <script src="https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js"></script>
    <style>__STYLE__</style>
</head>
<body>
    <div id="container">
        <div id="graph"></div>
        <div id="sidebar">
            <h2>Labels</h2>
            <div class="control">
                <label for="labelmode">Process</label>
                <select id="labelmode">
                    <option value="id">ID</option>
                    <option value="name">Name</option>
                </select>
            </div>
            <div class="control">
                <label for="flowlabelmode">Flow</label>
                <select id="flowlabelmode">
                    <option value="value">Value</option>
                    <option value="type">Type</option>
                </select>
            </div>

            <h2>Display</h2>
            <div class="control">
                <label for="colormode">Colors</label>
                <select id="colormode">
                    <option value="stage">Stage</option>
                    <option value="normal">Normal</option>
                </select>
            </div>
            <div class="control">
                <label for="hideunconnected">Hide unconnected</label>
                <select id="hideunconnected" data-bool="true">
                    <option value="false">No</option>
                    <option value="true">Yes</option>
                </select>
            </div>
            <div class="control">
                <label for="hidesmallnodes">Hide small nodes</label>
                <select id="hidesmallnodes" data-bool="true">
                    <option value="false">No</option>
                    <option value="true">Yes</option>
                </select>
            </div>
            <div class="control">
                <label for="showvirtual">Show virtual</label>
                <select id="showvirtual" data-bool="true">
                    <option value="true">Yes</option>
                    <option value="false">No</option>
                </select>
            </div>

            <h2>Layout</h2>
            <button id="freeze">Freeze</button>
            <button id="reset">Reset view</button>
            <button id="copy">Node positions</button>
            <textarea id="positions" readonly></textarea>
            <div id="status"></div>
        </div>
    </div>

    <script>
        const chart = echarts.init(document.getElementById('graph'));
        let frozen = false;
        let dragging = false;

        function tooltipFormatter(params) {
            return params.data && params.data.tooltip ? params.data.tooltip : '';
        }

        function applyOption(option) {
            option.baseOption.tooltip.formatter = tooltipFormatter;
            chart.setOption(option);
        }

        function currentLayout() {
            const series = chart.getModel() && chart.getModel().getSeriesByIndex(0);
            if (!series) return [];
            const data = series.getData();
            const layout = [];
            data.each((index) => {
                const item = data.getRawDataItem(index);
                const position = data.getItemLayout(index);
                if (!item || !position) return;
                if (Array.isArray(position)) {
                    layout.push({ id: item.id, x: position[0], y: position[1] });
                } else if (position.x !== undefined) {
                    layout.push({ id: item.id, x: position.x, y: position.y });
                }
            });
            return layout;
        }

        function currentViewport() {
            const series = chart.getModel() && chart.getModel().getSeriesByIndex(0);
            const coordSys = series && series.coordinateSystem;
            if (!coordSys || !coordSys.getZoom) return null;
            const center = coordSys.getCenter();
            return { zoom: coordSys.getZoom(), center: [center[0], center[1]] };
        }

        async function send(event) {
            event.layout = currentLayout();
            const viewport = currentViewport();
            if (viewport) event.viewport = viewport;

            const response = await fetch('/api/event', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify(event),
            });
            const status = document.getElementById('status');
            if (!response.ok) {
                status.textContent = await response.text();
                return;
            }
            status.textContent = '';
            const body = await response.json();
            if (body.rendered) applyOption(body.option);
        }

        chart.on('timelinechanged', (params) => {
            send({ type: 'timelinechanged', currentIndex: params.currentIndex });
        });

        chart.on('mousedown', { dataType: 'node' }, (params) => {
            dragging = true;
            send({ type: 'mousedown', dataType: 'node', dataIndex: params.dataIndex });
        });

        chart.on('mousemove', { dataType: 'node' }, (params) => {
            if (!dragging) return;
            send({ type: 'mousemove', dataType: 'node', dataIndex: params.dataIndex });
        });

        chart.on('mouseup', { dataType: 'node' }, () => {
            dragging = false;
            send({ type: 'mouseup', dataType: 'node' });
        });

        for (const id of ['labelmode', 'flowlabelmode', 'colormode', 'hideunconnected', 'hidesmallnodes', 'showvirtual']) {
            const select = document.getElementById(id);
            select.addEventListener('change', () => {
                const value = select.dataset.bool ? select.value === 'true' : select.value;
                send({ type: id, value: value });
            });
        }

        document.getElementById('freeze').addEventListener('click', (event) => {
            frozen = !frozen;
            event.target.textContent = frozen ? 'Unfreeze' : 'Freeze';
            send({ type: 'freeze' });
        });

        document.getElementById('reset').addEventListener('click', () => {
            frozen = false;
            document.getElementById('freeze').textContent = 'Freeze';
            send({ type: 'reset' });
        });

        document.getElementById('copy').addEventListener('click', async () => {
            const area = document.getElementById('positions');
            const response = await fetch('/api/positions');
            area.value = await response.text();
            area.classList.add('visible');
            area.select();
        });

        window.addEventListener('resize', () => chart.resize());

        async function loadSettings() {
            const response = await fetch('/api/filters');
            const filters = await response.json();
            document.getElementById('labelmode').value = filters.labelMode;
            document.getElementById('flowlabelmode').value = filters.flowLabelMode;
            document.getElementById('colormode').value = filters.colorMode;
            document.getElementById('hideunconnected').value = String(filters.hideUnconnected);
            document.getElementById('hidesmallnodes').value = String(filters.hideSmallNodes);
            document.getElementById('showvirtual').value = String(filters.showVirtual);
            frozen = filters.freezeLayout;
            document.getElementById('freeze').textContent = frozen ? 'Unfreeze' : 'Freeze';
        }

        async function loadOption() {
            const response = await fetch('/api/option');
            applyOption(await response.json());
        }

        loadSettings().then(loadOption);
    </script>
</body>
</html>
"#;

/// Self-contained page written by `flowmap render`. The option is embedded and the chart's
/// own timeline switches between years.
pub const STATIC_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>__TITLE__</title>
    <script src="https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js"></script>
    <style>__STYLE__</style>
</head>
<body>
    <div id="container">
        <div id="graph"></div>
    </div>

    <script>
        const option = __OPTION__;
        option.baseOption.tooltip.formatter = (params) =>
            params.data && params.data.tooltip ? params.data.tooltip : '';

        const chart = echarts.init(document.getElementById('graph'));
        chart.setOption(option);
        window.addEventListener('resize', () => chart.resize());
    </script>
</body>
</html>
"#;
