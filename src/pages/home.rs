use leptos::prelude::*;

use crate::components::flow_diagram::{
	EdgeKind, EdgeStyle, FlowDiagram, FlowEdge, FlowNode, NodeKind, NodeStyle, Size, Variant,
};

/// Three-step verification flow.
fn approval_nodes() -> Vec<FlowNode> {
	vec![
		FlowNode::new("1", "Request received", 250.0, 0.0).with_kind(NodeKind::Start),
		FlowNode::new("2", "Identity check", 250.0, 100.0),
		FlowNode::new("3", "Account opened", 250.0, 200.0).with_kind(NodeKind::End),
	]
}

fn approval_edges() -> Vec<FlowEdge> {
	vec![
		FlowEdge::new("e1-2", "1", "2"),
		FlowEdge::new("e2-3", "2", "3").with_label("Verified"),
		// Points at a node that does not exist and is never drawn.
		FlowEdge::new("e-bad", "1", "99"),
	]
}

/// One edge per connector style, fanning out from a single source.
fn connector_nodes() -> Vec<FlowNode> {
	let mut nodes = vec![FlowNode::new("src", "Source", 300.0, 0.0).with_kind(NodeKind::Start)];
	nodes.extend(
		["straight", "step", "smoothstep", "bezier"]
			.iter()
			.enumerate()
			.map(|(i, name)| {
				FlowNode::new(*name, *name, i as f64 * 200.0, 180.0).with_kind(NodeKind::Custom)
			}),
	);
	nodes
}

fn connector_edges() -> Vec<FlowEdge> {
	vec![
		FlowEdge::new("to-straight", "src", "straight").with_kind(EdgeKind::Straight),
		FlowEdge::new("to-step", "src", "step")
			.with_kind(EdgeKind::Step)
			.with_label("step"),
		FlowEdge::new("to-smoothstep", "src", "smoothstep")
			.with_kind(EdgeKind::SmoothStep)
			.animated(),
		FlowEdge::new("to-bezier", "src", "bezier")
			.with_kind(EdgeKind::Bezier)
			.with_style(EdgeStyle {
				stroke: Some("#8b5cf6".into()),
				stroke_width: Some(2.5),
			}),
	]
}

/// A node whose style cannot be drawn.
fn broken_nodes() -> Vec<FlowNode> {
	vec![FlowNode::new("x", "Broken", 0.0, 0.0).with_style(NodeStyle {
		width: Some(f64::NAN),
		..Default::default()
	})]
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (loaded, set_loaded) = signal(false);
	let streamed_nodes = Signal::derive(move || {
		if loaded.get() {
			approval_nodes()
		} else {
			Vec::new()
		}
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<main class="showcase">
				<h1>"Flow Diagram"</h1>
				<p class="subtitle">"Nodes and edges rendered as SVG, with optional dragging."</p>

				<section>
					<h2>"Read-only"</h2>
					<FlowDiagram
						nodes=Signal::derive(approval_nodes)
						edges=Signal::derive(approval_edges)
						title="Account approval"
						variant=Variant::Bordered
					/>
				</section>

				<section>
					<h2>"Interactive connectors"</h2>
					<p>"Drag nodes to reposition them."</p>
					<FlowDiagram
						nodes=Signal::derive(connector_nodes)
						edges=Signal::derive(connector_edges)
						variant=Variant::Solid
						size=Size::Lg
						interactive=true
					/>
				</section>

				<section>
					<h2>"Waiting for data"</h2>
					<button on:click=move |_| set_loaded.update(|l| *l = !*l)>
						{move || if loaded.get() { "Clear nodes" } else { "Load nodes" }}
					</button>
					<FlowDiagram nodes=streamed_nodes edges=Signal::derive(approval_edges) size=Size::Sm />
				</section>

				<section>
					<h2>"Render failure"</h2>
					<FlowDiagram nodes=Signal::derive(broken_nodes) size=Size::Sm class="demo-broken" />
				</section>
			</main>
		</ErrorBoundary>
	}
}
