use std::collections::VecDeque;

use crate::detection::domain::mask::Mask;
use crate::shared::region::{Point, Region};

/// Neighbor offsets indexed so that increasing index turns counterclockwise
/// on screen (y grows downward): E, NE, N, NW, W, SW, S, SE.
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];
const WEST: usize = 4;

/// Finds the outer boundary of every 8-connected blob that is not enclosed
/// by another blob.
///
/// Blobs sitting inside a hole of another blob yield nothing, and holes are
/// never traced. Regions are ordered by the raster position of each blob's
/// first pixel; their points keep only direction changes.
pub fn find_external_contours(mask: &Mask) -> Vec<Region> {
    let width = mask.width() as usize;
    let height = mask.height() as usize;
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let outside = outside_background(mask);
    let is_outside = |x: i32, y: i32| {
        x < 0
            || y < 0
            || x >= width as i32
            || y >= height as i32
            || outside[y as usize * width + x as usize]
    };

    let mut visited = vec![false; width * height];
    let mut regions = Vec::new();
    let mut queue = VecDeque::new();

    for y in 0..height {
        for x in 0..width {
            if visited[y * width + x] || !mask.get(x as i32, y as i32) {
                continue;
            }

            let start = Point::new(x as i32, y as i32);
            let mut external = false;
            visited[y * width + x] = true;
            queue.push_back(start);

            while let Some(p) = queue.pop_front() {
                if !external {
                    external = [(1, 0), (-1, 0), (0, 1), (0, -1)]
                        .iter()
                        .any(|&(dx, dy)| is_outside(p.x + dx, p.y + dy));
                }
                for &(dx, dy) in &DIRECTIONS {
                    let (nx, ny) = (p.x + dx, p.y + dy);
                    if !mask.get(nx, ny) {
                        continue;
                    }
                    let idx = ny as usize * width + nx as usize;
                    if !visited[idx] {
                        visited[idx] = true;
                        queue.push_back(Point::new(nx, ny));
                    }
                }
            }

            if external {
                regions.push(Region::new(compress(trace_outer_border(mask, start))));
            }
        }
    }

    regions
}

/// Background pixels 4-connected to the frame edge.
fn outside_background(mask: &Mask) -> Vec<bool> {
    let width = mask.width() as i32;
    let height = mask.height() as i32;
    let mut outside = vec![false; (width * height) as usize];
    let mut queue = VecDeque::new();

    let seed = |x: i32, y: i32, outside: &mut Vec<bool>, queue: &mut VecDeque<(i32, i32)>| {
        let idx = (y * width + x) as usize;
        if !mask.get(x, y) && !outside[idx] {
            outside[idx] = true;
            queue.push_back((x, y));
        }
    };

    for x in 0..width {
        seed(x, 0, &mut outside, &mut queue);
        seed(x, height - 1, &mut outside, &mut queue);
    }
    for y in 0..height {
        seed(0, y, &mut outside, &mut queue);
        seed(width - 1, y, &mut outside, &mut queue);
    }

    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let (nx, ny) = (x + dx, y + dy);
            if nx >= 0 && ny >= 0 && nx < width && ny < height {
                seed(nx, ny, &mut outside, &mut queue);
            }
        }
    }

    outside
}

fn step(p: Point, dir: usize) -> Point {
    let (dx, dy) = DIRECTIONS[dir];
    Point::new(p.x + dx, p.y + dy)
}

/// Border following from a blob's first raster pixel, whose west neighbor
/// is background. Walks counterclockwise on screen and stops when the walk
/// is about to repeat its first move.
fn trace_outer_border(mask: &Mask, start: Point) -> Vec<Point> {
    let first = (0..8)
        .map(|k| (WEST + 8 - k) % 8)
        .find(|&d| {
            let n = step(start, d);
            mask.get(n.x, n.y)
        });
    let Some(first_dir) = first else {
        return vec![start];
    };
    let second = step(start, first_dir);

    let mut points = Vec::new();
    let mut current = start;
    // Direction from `current` back to the previously visited pixel.
    let mut back_dir = first_dir;

    loop {
        let next_dir = (1..=8)
            .map(|k| (back_dir + k) % 8)
            .find(|&d| {
                let n = step(current, d);
                mask.get(n.x, n.y)
            })
            .unwrap_or(back_dir);
        points.push(current);

        let next = step(current, next_dir);
        if next == start && current == second {
            break;
        }
        back_dir = (next_dir + 4) % 8;
        current = next;
    }

    points
}

/// Drops points that continue in the same direction as the step before them.
fn compress(points: Vec<Point>) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points;
    }
    let kept: Vec<Point> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            (cur.x - prev.x, cur.y - prev.y) != (next.x - cur.x, next.y - cur.y)
        })
        .map(|i| points[i])
        .collect();
    if kept.is_empty() {
        vec![points[0]]
    } else {
        kept
    }
}
