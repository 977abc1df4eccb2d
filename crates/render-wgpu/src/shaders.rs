/// Scene pass: box meshes with basic, matcap and lambert materials plus
/// exponential-squared fog. Writes linear HDR colour; alpha 1 marks scene
/// pixels, the clear value uses alpha 0.
pub const SCENE_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    ambient: vec4<f32>,
    // xyz: direction the light travels (world space); w: 1 when present.
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
    fog_color: vec4<f32>,
    // x: density, y: enabled, z: uTime
    fog: vec4<f32>,
};

struct Object {
    model: mat4x4<f32>,
    color: vec4<f32>,
    // x: material (0 basic, 1 matcap, 2 lambert), y: matcap texture bound
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> globals: Globals;
@group(1) @binding(0) var<uniform> object: Object;
@group(2) @binding(0) var matcap_tex: texture_2d<f32>;
@group(2) @binding(1) var matcap_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) view_position: vec3<f32>,
    @location(1) view_normal: vec3<f32>,
    @location(2) world_normal: vec3<f32>,
};

@vertex
fn vs_scene(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
) -> VertexOutput {
    let world = object.model * vec4<f32>(position, 1.0);
    let view_position = globals.view * world;
    let world_normal = normalize((object.model * vec4<f32>(normal, 0.0)).xyz);

    var out: VertexOutput;
    out.clip_position = globals.view_proj * world;
    out.view_position = view_position.xyz;
    out.world_normal = world_normal;
    out.view_normal = normalize((globals.view * vec4<f32>(world_normal, 0.0)).xyz);
    return out;
}

fn matcap_uv(view_position: vec3<f32>, n: vec3<f32>) -> vec2<f32> {
    let view_dir = normalize(-view_position);
    let x = normalize(vec3<f32>(view_dir.z, 0.0, -view_dir.x));
    let y = cross(view_dir, x);
    return vec2<f32>(dot(x, n), dot(y, n)) * 0.495 + 0.5;
}

@fragment
fn fs_scene(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = object.color.rgb;
    let uv = matcap_uv(in.view_position, normalize(in.view_normal));
    let sampled = textureSample(matcap_tex, matcap_sampler, vec2<f32>(uv.x, 1.0 - uv.y)).rgb;
    let ramp = vec3<f32>(mix(0.2, 0.8, uv.y));

    var color = base;
    let kind = u32(object.params.x + 0.5);
    if kind == 1u {
        color = base * select(ramp, sampled, object.params.y > 0.5);
    } else if kind == 2u {
        let n = normalize(in.world_normal);
        let diffuse = max(dot(n, -globals.light_dir.xyz), 0.0) * globals.light_dir.w;
        color = base * (globals.ambient.rgb + globals.light_color.rgb * diffuse);
    }

    if globals.fog.y > 0.5 {
        let d = globals.fog.x * -in.view_position.z;
        let factor = clamp(1.0 - exp(-d * d), 0.0, 1.0);
        color = mix(color, globals.fog_color.rgb, factor);
    }
    return vec4<f32>(color, 1.0);
}
"#;

/// Post pass: ACES filmic tone mapping on scene pixels, background passed
/// through, optional sRGB encode, rescaled to the surface by the sampler.
pub const POST_SHADER: &str = r#"
struct Post {
    // x: exposure, y: tone mapping on, z: encode sRGB in shader, w: opaque output
    params: vec4<f32>,
};

@group(0) @binding(0) var hdr_tex: texture_2d<f32>;
@group(0) @binding(1) var hdr_sampler: sampler;
@group(0) @binding(2) var<uniform> post: Post;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_fullscreen(@builtin(vertex_index) index: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: VertexOutput;
    out.clip_position = vec4<f32>(uv * vec2<f32>(2.0, -2.0) + vec2<f32>(-1.0, 1.0), 0.0, 1.0);
    out.uv = uv;
    return out;
}

fn rrt_and_odt_fit(v: vec3<f32>) -> vec3<f32> {
    let a = v * (v + 0.0245786) - 0.000090537;
    let b = v * (0.983729 * v + 0.4329510) + 0.238081;
    return a / b;
}

fn aces_filmic(color: vec3<f32>, exposure: f32) -> vec3<f32> {
    let aces_input = mat3x3<f32>(
        vec3<f32>(0.59719, 0.07600, 0.02840),
        vec3<f32>(0.35458, 0.90834, 0.13383),
        vec3<f32>(0.04823, 0.01566, 0.83777),
    );
    let aces_output = mat3x3<f32>(
        vec3<f32>(1.60475, -0.10208, -0.00327),
        vec3<f32>(-0.53108, 1.10813, -0.07276),
        vec3<f32>(-0.07367, -0.00605, 1.07602),
    );
    var c = color * exposure / 0.6;
    c = aces_input * c;
    c = rrt_and_odt_fit(c);
    c = aces_output * c;
    return clamp(c, vec3<f32>(0.0), vec3<f32>(1.0));
}

fn linear_to_srgb(c: vec3<f32>) -> vec3<f32> {
    let low = c * 12.92;
    let high = 1.055 * pow(c, vec3<f32>(1.0 / 2.4)) - 0.055;
    return select(high, low, c <= vec3<f32>(0.0031308));
}

@fragment
fn fs_post(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(hdr_tex, hdr_sampler, in.uv);
    var color = texel.rgb;
    if post.params.y > 0.5 {
        // Multisampled edges carry fractional coverage in alpha.
        color = mix(color, aces_filmic(color, post.params.x), texel.a);
    }
    if post.params.z > 0.5 {
        color = linear_to_srgb(max(color, vec3<f32>(0.0)));
    }
    let alpha = select(texel.a, 1.0, post.params.w > 0.5);
    return vec4<f32>(color, alpha);
}
"#;
