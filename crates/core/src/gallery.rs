use serde::Serialize;

/// Prompts offered as one-click starting points.
pub const EXAMPLE_PROMPTS: [&str; 5] = [
    "explain (a+b)^2",
    "sum of 1 to n",
    "explain bubble sort algorithm",
    "explain dfs",
    "a guy shaking hands with a horse",
];

/// A ready-to-render scene.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExampleScene {
    pub name: &'static str,
    pub code: &'static str,
}

pub const EXAMPLE_SCENES: [ExampleScene; 3] = [
    ExampleScene {
        name: "Simple Square",
        code: "from manim import *
class CreateSquare(Scene):
    def construct(self):
        square = Square(side_length=2).set_fill(BLUE, opacity=0.5)
        self.play(Create(square))
        self.play(square.animate.rotate(PI/2))
        self.wait()",
    },
    ExampleScene {
        name: "Moving Circle",
        code: "from manim import *
class MovingCircle(Scene):
    def construct(self):
        circle = Circle().set_fill(RED, opacity=0.5)
        self.play(Create(circle))
        self.play(circle.animate.shift(RIGHT * 2))
        self.wait()",
    },
    ExampleScene {
        name: "Text Animation",
        code: "from manim import *
class TextAnimation(Scene):
    def construct(self):
        text = Text(\"Hello, Manim!\", font_size=48)
        self.play(Write(text))
        self.wait()",
    },
];

/// Scene shown in the editor before anything has been generated.
pub fn default_scene() -> &'static ExampleScene {
    &EXAMPLE_SCENES[0]
}

/// Look up an example scene by name. Unknown names give empty code.
pub fn example_code(name: &str) -> &'static str {
    EXAMPLE_SCENES
        .iter()
        .find(|scene| scene.name == name)
        .map(|scene| scene.code)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{entry_class_name, validate_code};

    #[test]
    fn test_every_example_scene_passes_validation() {
        for scene in EXAMPLE_SCENES {
            assert!(validate_code(scene.code).is_ok(), "{} failed", scene.name);
            assert!(entry_class_name(scene.code).is_some(), "{} has no class", scene.name);
        }
    }

    #[test]
    fn test_example_code_lookup() {
        assert!(example_code("Moving Circle").contains("class MovingCircle(Scene):"));
        assert_eq!(example_code("Nope"), "");
        assert_eq!(default_scene().name, "Simple Square");
    }
}
