use std::sync::atomic::{AtomicUsize, Ordering};

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};

use super::render::{EdgeShape, Fallback, LOADING_TEXT, NodeShape, Panel, Scene, render_pass};
use super::state::FlowState;
use super::types::{FlowEdge, FlowNode, Frame, Position, Size, Variant};

static NEXT_INSTANCE: AtomicUsize = AtomicUsize::new(0);

/// Id of the node under the event target, if any.
fn node_id_at(ev: &MouseEvent) -> Option<String> {
	let target: Element = ev.target()?.dyn_into().ok()?;
	target
		.closest("[data-node-id]")
		.ok()
		.flatten()?
		.get_attribute("data-node-id")
}

fn client_point(ev: &MouseEvent) -> Position {
	Position::new(ev.client_x() as f64, ev.client_y() as f64)
}

/// Node/edge diagram drawn as SVG.
///
/// An empty `nodes` list shows a "building diagram" placeholder. Nodes can be
/// dragged when `interactive` is set; dragged positions are local and are
/// reset whenever a new node list arrives.
#[component]
pub fn FlowDiagram(
	/// Nodes to draw; replacing the list resets dragged positions.
	#[prop(into)]
	nodes: Signal<Vec<FlowNode>>,
	/// Connections between nodes.
	#[prop(into, default = Signal::derive(Vec::new))]
	edges: Signal<Vec<FlowEdge>>,
	/// Heading above the canvas.
	#[prop(into, optional)]
	title: Option<String>,
	/// Container look.
	#[prop(optional)]
	variant: Variant,
	/// Container height.
	#[prop(optional)]
	size: Size,
	/// Keep every node in view.
	#[prop(into, default = Signal::derive(|| true))]
	fit_view: Signal<bool>,
	/// Allow dragging nodes.
	#[prop(into, default = Signal::derive(|| false))]
	interactive: Signal<bool>,
	/// Extra classes for the container.
	#[prop(into, optional)]
	class: String,
) -> impl IntoView {
	let marker_prefix = format!("flow-{}", NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed));
	let state = RwSignal::new(nodes.with_untracked(|nodes| {
		FlowState::new(nodes, fit_view.get_untracked(), interactive.get_untracked())
	}));

	Effect::new(move |_| {
		nodes.with(|nodes| {
			debug!("flow diagram received {} nodes", nodes.len());
			state.update(|s| s.set_nodes(nodes));
		});
	});
	Effect::new(move |_| {
		let fit_view = fit_view.get();
		state.update(|s| s.set_fit_view(fit_view));
	});
	Effect::new(move |_| {
		let interactive = interactive.get();
		state.update(|s| s.set_interactive(interactive));
	});

	let outcome = Memo::new(move |_| {
		nodes.with(|nodes| {
			edges.with(|edges| state.with(|s| render_pass(s, nodes, edges, &marker_prefix)))
		})
	});
	let panel = Memo::new(move |_| nodes.with(|nodes| outcome.with(|o| Panel::select(nodes, o))));

	let svg_ref = NodeRef::<leptos::svg::Svg>::new();

	let on_mousedown = move |ev: MouseEvent| {
		if !state.with_untracked(FlowState::interactive) {
			return;
		}
		let (Some(node_id), Some(svg)) = (node_id_at(&ev), svg_ref.get_untracked()) else {
			return;
		};
		ev.prevent_default();
		let rect = svg.get_bounding_client_rect();
		let pointer = client_point(&ev);
		state.update(|s| {
			let scale = s.viewport().client_scale(rect.width(), rect.height());
			s.pointer_down(&node_id, pointer, scale);
		});
	};

	let on_mousemove = move |ev: MouseEvent| {
		if state.with_untracked(FlowState::is_dragging) {
			let pointer = client_point(&ev);
			state.update(|s| {
				s.pointer_move(pointer);
			});
		}
	};

	let on_mouseup = move |_: MouseEvent| {
		if state.with_untracked(FlowState::is_dragging) {
			state.update(FlowState::pointer_up);
		}
	};

	let on_mouseleave = move |_: MouseEvent| {
		if state.with_untracked(FlowState::is_dragging) {
			state.update(FlowState::pointer_leave);
		}
	};

	let frame = Frame::new(variant, size, &class);

	move || {
		let Frame { class, style } = frame.clone();
		match panel.get() {
			Panel::Failed(fallback) => view! {
				<div class=class style=style role="alert">
					<ErrorPanel fallback=fallback />
				</div>
			}
			.into_any(),
			Panel::Loading => view! {
				<div class=class style=style>
					{title.clone().map(|title| view! { <h3 class="flow-diagram-title">{title}</h3> })}
					<div class="flow-diagram-body">
						<LoadingPlaceholder />
					</div>
				</div>
			}
			.into_any(),
			Panel::Diagram => view! {
				<div class=class style=style>
					{title.clone().map(|title| view! { <h3 class="flow-diagram-title">{title}</h3> })}
					<div class="flow-diagram-body">
						<svg
							node_ref=svg_ref
							class=move || {
								if interactive.get() {
									"flow-diagram-canvas flow-diagram-canvas--interactive"
								} else {
									"flow-diagram-canvas"
								}
							}
							width="100%"
							height="100%"
							viewBox=move || state.with(|s| s.viewport().view_box())
							preserveAspectRatio="xMidYMid meet"
							on:mousedown=on_mousedown
							on:mousemove=on_mousemove
							on:mouseup=on_mouseup
							on:mouseleave=on_mouseleave
						>
							{move || outcome.get().ok().map(scene_view)}
						</svg>
					</div>
				</div>
			}
			.into_any(),
		}
	}
}

fn scene_view(scene: Scene) -> impl IntoView {
	let Scene {
		nodes,
		edges,
		markers,
		..
	} = scene;

	view! {
		<defs>
			{markers
				.into_iter()
				.map(|marker| {
					view! {
						<marker
							id=marker.id
							viewBox="0 0 10 10"
							markerUnits="userSpaceOnUse"
							markerWidth=marker.size.to_string()
							markerHeight=marker.size.to_string()
							refX=marker.ref_x.to_string()
							refY="5"
							orient="auto-start-reverse"
						>
							<path d="M 0 0 L 10 5 L 0 10 z" fill=marker.color />
						</marker>
					}
				})
				.collect_view()}
		</defs>
		<g class="flow-diagram-edges">{edges.into_iter().map(edge_view).collect_view()}</g>
		<g class="flow-diagram-nodes">{nodes.into_iter().map(node_view).collect_view()}</g>
	}
}

fn edge_view(edge: EdgeShape) -> impl IntoView {
	let class = if edge.animated {
		"flow-diagram-edge flow-diagram-edge--animated"
	} else {
		"flow-diagram-edge"
	};
	let marker_end = format!("url(#{})", edge.marker_id);

	view! {
		<g class="flow-diagram-edge-group" data-edge-id=edge.id>
			<path
				class=class
				d=edge.d
				fill="none"
				stroke=edge.stroke
				stroke-width=edge.stroke_width.to_string()
				marker-end=marker_end
			/>
			{edge.label.map(|label| {
				view! {
					<text
						class="flow-diagram-edge-label"
						x=label.x.to_string()
						y=label.y.to_string()
						text-anchor="middle"
					>
						{label.text}
					</text>
				}
			})}
		</g>
	}
}

fn node_view(node: NodeShape) -> impl IntoView {
	let transform = format!("translate({} {})", node.x, node.y);

	view! {
		<g class="flow-diagram-node" data-node-id=node.id transform=transform>
			<rect
				width=node.width.to_string()
				height=node.height.to_string()
				rx=node.radius.to_string()
				fill=node.fill
				stroke=node.stroke
				stroke-width=node.stroke_width.to_string()
			/>
			<text
				class="flow-diagram-node-label"
				x={(node.width / 2.0).to_string()}
				y={(node.height / 2.0).to_string()}
				text-anchor="middle"
				dominant-baseline="central"
				fill=node.text_color
			>
				{node.label}
			</text>
		</g>
	}
}

#[component]
fn LoadingPlaceholder() -> impl IntoView {
	view! {
		<div class="flow-diagram-loading">
			<div class="flow-diagram-dots">
				<span class="flow-diagram-dot" />
				<span class="flow-diagram-dot" />
				<span class="flow-diagram-dot" />
			</div>
			<p>{LOADING_TEXT}</p>
		</div>
	}
}

#[component]
fn ErrorPanel(fallback: Fallback) -> impl IntoView {
	view! {
		<div class="flow-diagram-error">
			<p class="flow-diagram-error-title">{fallback.message}</p>
			<p class="flow-diagram-error-detail">{fallback.detail}</p>
		</div>
	}
}
